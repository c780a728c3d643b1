// ABOUTME: End-to-end tests running the full cleaning pipeline over Word-style documents.
// ABOUTME: Checks the rebuilt TOC, heading ids, idempotence, anchor text and encoding round trips.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wordclean_core::{remove_artifacts, ArtifactOptions, CleanReport, Cleaner, Document};

const REPORT: &str = r##"<html>
<head>
<meta content="Microsoft Word 15" name="Generator">
<title>Report</title>
</head>
<body lang="EN-US">
<div class="WordSection1">
<p class="MsoTitle">Annual report</p>
<p class="MsoNormal">&nbsp;</p>
<p class="MsoToc1"><a href="#_Toc100">1. Introduction 2</a></p>
<p class="MsoToc2"><a href="#_Toc101">1.1 Background 2</a></p>
<p class="MsoToc1"><a href="#_Toc102">2. Findings 5</a></p>
</div>
<div class="WordSection2">
<h1><a name="_Toc100">1.&nbsp;Introduction</a></h1>
<p class="MsoNormal">See <a name="_Hlk1">the figures</a> below.</p>
<h2><a name="_Toc101">1.1 Background</a></h2>
<table class="MsoTableGrid"><tr><td><p class="MsoNormal">cell</p></td></tr></table>
<br>
<h1><a name="_Toc102">2. Findings</a></h1>
<p class="MsoNormal"><img src="chart.png"></p>
</div>
</body>
</html>"##;

fn find_heading(doc: &Document, id: &str) -> String {
    let matches = doc.select(&format!("#{}", id));
    let heading = matches
        .nodes()
        .first()
        .unwrap_or_else(|| panic!("no element with id {}", id));
    heading.html().to_string()
}

fn parse(html: &str) -> Document {
    Document::from(html)
}

#[test]
fn word_report_is_cleaned() {
    let doc = parse(REPORT);
    let report = remove_artifacts(&doc, &ArtifactOptions::default());

    assert_eq!(
        report,
        CleanReport {
            generator_meta: 1,
            anchors_unwrapped: 1,
            headings_cleaned: 3,
            classes_stripped: 6,
            sections_unwrapped: 2,
            toc_entries: 3,
            empty_paragraphs: 1,
            table_breaks: 1,
            ..CleanReport::default()
        }
    );

    assert_eq!(find_heading(&doc, "Toc100"), r#"<h1 id="Toc100">Introduction</h1>"#);
    assert_eq!(find_heading(&doc, "Toc101"), r#"<h2 id="Toc101">Background</h2>"#);
    assert_eq!(find_heading(&doc, "Toc102"), r#"<h1 id="Toc102">Findings</h1>"#);

    let html = doc.html().to_string();
    assert!(!html.contains("Mso"));
    assert!(!html.contains("WordSection"));
    assert!(!html.contains("name="));
    assert!(!html.contains("Generator"));
    assert!(!html.contains("<br"));
    assert!(html.contains("<p>See the figures below.</p>"));
    assert!(html.contains(r#"<p><img src="chart.png"></p>"#));
    assert!(html.contains("<p>Annual report</p>"));
}

#[test]
fn word_report_toc_links_to_heading_ids() {
    let doc = parse(REPORT);
    remove_artifacts(&doc, &ArtifactOptions::default());

    assert_eq!(doc.select("ol").length(), 2);
    let toc = doc.select("ol#toc");
    assert_eq!(toc.length(), 1);

    let links: Vec<_> = toc
        .select("a")
        .nodes()
        .iter()
        .map(|a| (a.attr("href").unwrap_or_default().to_string(), a.text().to_string()))
        .collect();
    assert_eq!(
        links,
        vec![
            ("#Toc100".to_string(), "Introduction".to_string()),
            ("#Toc101".to_string(), "Background".to_string()),
            ("#Toc102".to_string(), "Findings".to_string()),
        ]
    );

    for (href, _) in links {
        assert!(doc.select(&href).exists(), "no target for {}", href);
    }
}

#[test]
fn second_run_changes_nothing() {
    let doc = parse(REPORT);
    remove_artifacts(&doc, &ArtifactOptions::default());
    let once = doc.html().to_string();

    let report = remove_artifacts(&doc, &ArtifactOptions::default());
    assert_eq!(report, CleanReport::default());
    assert_eq!(doc.html().to_string(), once);
}

#[test]
fn toc_bookmark_outside_heading_survives_second_run() {
    let doc = parse(
        r##"<body><p class="MsoToc1"><a href="#_Toc1">Intro 1</a></p><p><a name="_Toc1"></a>Intro para</p></body>"##,
    );
    let first = remove_artifacts(&doc, &ArtifactOptions::default());
    assert_eq!(first.anchors_unwrapped, 0);
    assert_eq!(first.toc_entries, 1);
    let once = doc.html().to_string();
    assert!(once.contains(r##"<a href="#Toc1">Intro</a>"##));

    let second = remove_artifacts(&doc, &ArtifactOptions::default());
    assert_eq!(second.anchors_unwrapped, 0);
    assert_eq!(second, CleanReport::default());
    assert_eq!(doc.html().to_string(), once);
}

#[test]
fn unwrapped_anchor_text_is_preserved() {
    let doc = parse(r#"<body><p>before <a name="x">kept <i>inner</i> text</a> after</p></body>"#);
    let before = doc.select("body").text().to_string();

    let report = remove_artifacts(&doc, &ArtifactOptions::default());
    assert_eq!(report.anchors_unwrapped, 1);
    assert_eq!(doc.select("body").text().to_string(), before);
    assert!(!doc.select("a").exists());
    assert_eq!(doc.select("p > i").length(), 1);
}

#[test]
fn flat_toc_becomes_single_list() {
    let doc = parse(
        r##"<body><p class="MsoToc1"><a href="#_Toc1">One 1</a></p>
<p class="MsoToc1"><a href="#_Toc2">Two 2</a></p>
<p class="MsoToc1"><a href="#_Toc3">Three 3</a></p></body>"##,
    );
    remove_artifacts(&doc, &ArtifactOptions::default());

    assert_eq!(doc.select("ol").length(), 1);
    assert_eq!(doc.select("ol#toc > li").length(), 3);
    assert_eq!(doc.select("li").length(), 3);
}

#[test]
fn skipped_level_keeps_single_decrement() {
    // Level 3 straight back to level 1 pops only the innermost list, so the
    // last entry lands in the level-2 list rather than the top one.
    let doc = parse(
        r##"<body><p class="MsoToc1"><a href="#_Toc1">One 1</a></p>
<p class="MsoToc2"><a href="#_Toc2">Two 1</a></p>
<p class="MsoToc3"><a href="#_Toc3">Three 1</a></p>
<p class="MsoToc1"><a href="#_Toc4">Four 2</a></p></body>"##,
    );
    remove_artifacts(&doc, &ArtifactOptions::default());

    assert_eq!(doc.select("ol#toc > li").length(), 1);
    let four = doc.select(r##"a[href="#Toc4"]"##);
    assert_eq!(four.text().to_string(), "Four");
    assert_eq!(doc.select(r##"ol#toc > li > ol > li > a[href="#Toc4"]"##).length(), 1);
}

#[test]
fn cleaner_round_trips_legacy_encoding() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.htm");
    fs::write(
        &path,
        b"<html><head></head><body><p class=\"MsoNormal\">Caf\xe9 cr\xe8me</p></body></html>".as_slice(),
    )
    .unwrap();

    let cleaner = Cleaner::builder()
        .input_encoding("windows-1252")
        .output_encoding("windows-1252")
        .build();
    let report = cleaner.edit_file(&path).unwrap();
    assert_eq!(report.classes_stripped, 1);

    assert_eq!(
        fs::read(&path).unwrap(),
        b"<html><head></head><body><p>Caf\xe9 cr\xe8me</p></body></html>".to_vec()
    );
}

#[test]
fn cleaner_writes_utf8_from_legacy_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.html");
    let output = dir.path().join("out.html");
    fs::write(&input, b"<p>na\xefve</p>".as_slice()).unwrap();

    let cleaner = Cleaner::builder().input_encoding("latin1").build();
    cleaner.edit_file_as(&input, &output).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "<html><head></head><body><p>na\u{ef}ve</p></body></html>"
    );
}

#[test]
fn saved_file_declares_its_new_charset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.htm");
    fs::write(
        &path,
        b"<html><head><meta http-equiv=Content-Type content=\"text/html; charset=windows-1252\"></head><body><p>Caf\xe9</p></body></html>"
            .as_slice(),
    )
    .unwrap();

    let cleaner = Cleaner::builder().input_encoding("windows-1252").build();
    cleaner.edit_file(&path).unwrap();

    let saved = fs::read_to_string(&path).unwrap();
    assert!(saved.contains(r#"<meta http-equiv="Content-Type" content="text/html; charset=utf-8">"#));
    assert!(!saved.contains("windows-1252"));
    assert!(saved.contains("<p>Caf\u{e9}</p>"));
}
