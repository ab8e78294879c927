use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sysfont_core::{FontsDocument, LocaleSource, SystemFontIterator, SystemFontsConfig};
use tempfile::TempDir;

/// A font directory plus a `fonts.xml` next to it.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(xml: &str, installed: &[&str]) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("fonts")).expect("mkdir fonts");
        fs::write(dir.path().join("fonts.xml"), xml).expect("write fonts.xml");
        for name in installed {
            let path = dir.path().join("fonts").join(name);
            fs::create_dir_all(path.parent().unwrap()).expect("mkdir");
            fs::write(path, b"\0\x01\0\0").expect("touch font");
        }
        Self { dir }
    }

    fn font_dir(&self) -> PathBuf {
        self.dir.path().join("fonts")
    }

    fn config(&self) -> SystemFontsConfig {
        SystemFontsConfig::default()
            .with_config_path(self.dir.path().join("fonts.xml"))
            .with_font_dir(self.font_dir())
    }

    fn open(&self) -> SystemFontIterator {
        SystemFontIterator::open_with(&self.config())
    }

    fn file_names(&self) -> Vec<String> {
        self.open()
            .map(|font| {
                font.file_path()
                    .strip_prefix(self.font_dir())
                    .expect("under font dir")
                    .display()
                    .to_string()
            })
            .collect()
    }
}

const THREE_FAMILIES: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<familyset version="23">
    <family name="sans-serif">
        <font weight="400" style="normal">Roboto-Regular.ttf</font>
        <font weight="400" style="italic">Roboto-Italic.ttf</font>
        <font weight="700" style="normal">Roboto-Bold.ttf</font>
    </family>
    <alias name="arial" to="sans-serif"/>
    <family lang="und-Arab" variant="elegant">
        <font weight="400" style="normal">NotoNaskhArabic-Regular.ttf</font>
    </family>
    <family lang="ja">
        <font weight="400" style="normal" index="0">NotoSansCJK-Regular.ttc</font>
    </family>
</familyset>
"#;

#[test]
fn yields_installed_fonts_in_document_order() {
    let fixture = Fixture::new(
        THREE_FAMILIES,
        &[
            "Roboto-Regular.ttf",
            "Roboto-Italic.ttf",
            "Roboto-Bold.ttf",
            "NotoNaskhArabic-Regular.ttf",
            "NotoSansCJK-Regular.ttc",
        ],
    );

    assert_eq!(
        fixture.file_names(),
        vec![
            "Roboto-Regular.ttf",
            "Roboto-Italic.ttf",
            "Roboto-Bold.ttf",
            "NotoNaskhArabic-Regular.ttf",
            "NotoSansCJK-Regular.ttc",
        ]
    );
}

#[test]
fn skips_missing_files_across_family_boundaries() {
    let fixture = Fixture::new(
        THREE_FAMILIES,
        &["Roboto-Regular.ttf", "NotoSansCJK-Regular.ttc"],
    );

    assert_eq!(
        fixture.file_names(),
        vec!["Roboto-Regular.ttf", "NotoSansCJK-Regular.ttc"]
    );
}

#[test]
fn first_record_is_not_checked_for_availability() {
    let fixture = Fixture::new(THREE_FAMILIES, &["Roboto-Bold.ttf"]);

    assert_eq!(
        fixture.file_names(),
        vec!["Roboto-Regular.ttf", "Roboto-Bold.ttf"]
    );
}

#[test]
fn nothing_installed_still_yields_the_first_entry() {
    let fixture = Fixture::new(THREE_FAMILIES, &[]);
    assert_eq!(fixture.file_names(), vec!["Roboto-Regular.ttf"]);
}

#[test]
fn directories_do_not_count_as_installed() {
    let fixture = Fixture::new(THREE_FAMILIES, &[]);
    fs::create_dir_all(fixture.font_dir().join("Roboto-Bold.ttf")).expect("mkdir");

    assert_eq!(fixture.file_names(), vec!["Roboto-Regular.ttf"]);
}

#[test]
fn empty_family_is_skipped_transparently() {
    let fixture = Fixture::new(
        r#"<familyset><family name="A"/><family name="B"><font>b.ttf</font></family></familyset>"#,
        &["b.ttf"],
    );

    let fonts: Vec<_> = fixture.open().collect();
    assert_eq!(fonts.len(), 1);
    assert_eq!(fonts[0].file_path(), fixture.font_dir().join("b.ttf"));
}

#[test]
fn empty_families_between_fonts_are_skipped() {
    let fixture = Fixture::new(
        r#"<familyset>
            <family><font>a.ttf</font></family>
            <family/>
            <family></family>
            <family><font>c.ttf</font></family>
        </familyset>"#,
        &["a.ttf", "c.ttf"],
    );

    assert_eq!(fixture.file_names(), vec!["a.ttf", "c.ttf"]);
}

#[test]
fn exhaustion_is_idempotent() {
    let fixture = Fixture::new(THREE_FAMILIES, &[]);
    let mut iter = fixture.open();

    assert!(iter.next().is_some());
    assert!(!iter.is_exhausted());
    assert!(iter.next().is_none());
    assert!(iter.is_exhausted());
    for _ in 0..3 {
        assert!(iter.next().is_none());
    }
}

#[test]
fn document_without_fonts_is_exhausted_on_first_call() {
    let fixture = Fixture::new(
        r#"<familyset><family/><alias name="x" to="y"/></familyset>"#,
        &[],
    );
    let mut iter = fixture.open();

    assert!(iter.next().is_none());
    assert!(iter.is_exhausted());
}

#[test]
fn unparsable_document_yields_nothing() {
    let fixture = Fixture::new("<familyset><family><font>a.ttf</font>", &["a.ttf"]);
    assert!(fixture.file_names().is_empty());
}

#[test]
fn missing_document_yields_nothing() {
    let config = SystemFontsConfig::default()
        .with_config_path("/nonexistent/sysfont/fonts.xml")
        .with_font_dir("/nonexistent/sysfont/fonts");
    let mut iter = SystemFontIterator::open_with(&config);

    assert!(iter.next().is_none());
    assert!(iter.is_exhausted());
}

#[test]
fn extracts_every_field() {
    let fixture = Fixture::new(
        r#"<familyset>
            <family lang="en">
                <font weight="300" style="italic" index="2">
                    Variable.ttc
                    <axis tag="wght" stylevalue="1.5"/>
                    <axis tag="wdth" stylevalue="75"/>
                </font>
            </family>
        </familyset>"#,
        &[],
    );

    let font = fixture.open().next().expect("font");
    assert_eq!(font.file_path(), fixture.font_dir().join("Variable.ttc"));
    assert_eq!(font.weight(), 300);
    assert!(font.is_italic());
    assert_eq!(font.collection_index(), 2);
    assert_eq!(font.locale(), Some("en"));
    assert_eq!(font.axis_count(), 2);
    assert_eq!(font.axis_tag(0).to_be_bytes(), *b"wght");
    assert_eq!(font.axis_value(0), 1.5);
    assert_eq!(font.axis_tag(1).to_be_bytes(), *b"wdth");
    assert_eq!(font.axis_value(1), 75.0);
}

#[test]
fn locale_comes_from_the_enclosing_family() {
    let fixture = Fixture::new(THREE_FAMILIES, &["NotoNaskhArabic-Regular.ttf", "NotoSansCJK-Regular.ttc"]);
    let locales: Vec<Option<String>> = fixture
        .open()
        .map(|font| font.locale().map(str::to_string))
        .collect();

    assert_eq!(
        locales,
        vec![None, Some("und-Arab".to_string()), Some("ja".to_string())]
    );
}

#[test]
fn document_parent_locale_source_never_sets_a_locale() {
    let fixture = Fixture::new(THREE_FAMILIES, &["NotoNaskhArabic-Regular.ttf", "NotoSansCJK-Regular.ttc"]);
    let config = fixture
        .config()
        .with_locale_source(LocaleSource::DocumentParent);

    let fonts: Vec<_> = SystemFontIterator::open_with(&config).collect();
    assert_eq!(fonts.len(), 3);
    assert!(fonts.iter().all(|font| font.locale().is_none()));
}

#[test]
fn records_outlive_the_iterator_and_the_files() {
    let fixture = Fixture::new(THREE_FAMILIES, &["Roboto-Bold.ttf"]);
    let mut iter = fixture.open();
    let first = iter.next().expect("first");
    let second = iter.next().expect("second");
    iter.close();
    drop(fixture);

    assert!(first.file_path().ends_with("Roboto-Regular.ttf"));
    assert_eq!(second.weight(), 700);
}

#[test]
fn long_runs_of_missing_files_do_not_recurse() {
    let mut xml = String::from("<familyset><family><font>first.ttf</font></family>");
    for i in 0..50_000 {
        xml.push_str(&format!("<family><font>missing-{i}.ttf</font></family>"));
    }
    xml.push_str("<family><font>last.ttf</font></family></familyset>");

    let doc = Arc::new(FontsDocument::parse(&xml));
    let config = SystemFontsConfig::default().with_font_dir("/fonts");
    let names: Vec<PathBuf> = SystemFontIterator::from_document(doc, &config)
        .with_availability(|path: &Path| path.ends_with("last.ttf"))
        .map(|font| font.file_path().to_path_buf())
        .collect();

    assert_eq!(
        names,
        vec![PathBuf::from("/fonts/first.ttf"), PathBuf::from("/fonts/last.ttf")]
    );
}

#[test]
fn independent_iterators_share_a_document() {
    let doc = Arc::new(FontsDocument::parse(THREE_FAMILIES));
    let config = SystemFontsConfig::default().with_font_dir("/fonts");

    let a: Vec<_> = SystemFontIterator::from_document(Arc::clone(&doc), &config)
        .with_availability(|_: &Path| true)
        .collect();
    let b: Vec<_> = SystemFontIterator::from_document(Arc::clone(&doc), &config)
        .with_availability(|_: &Path| true)
        .collect();

    assert_eq!(a.len(), 5);
    assert_eq!(a, b);
    assert_eq!(Arc::strong_count(&doc), 1);
}
