use pagecheck_engine::{
    AssertOptions, AssertionError, Bounds, Palette, Reporter, Section, assert_content_contains,
    assert_content_equals, assert_content_excludes, diff, extract, minimize,
};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

fn main_section() -> AssertOptions {
    AssertOptions::default().with_bounds(Bounds::new().starts_after("<main>").ends_before("</main>"))
}

#[test]
fn flattened_page_is_a_single_line() {
    let minimized = minimize(&fixture("article.html"), true);
    assert!(!minimized.contains('\n'));
    assert!(minimized.starts_with("<!DOCTYPE html><html><head><title>Test Page | Example</title>"));
    assert!(minimized.contains("<h1>Home Page Header</h1>"));
    assert!(minimized.contains("<p>Tom & Jerry's adventures continue.</p>"));
    assert!(minimized.contains("<li>First</li><li>Second</li>"));
    assert!(minimized.contains("<p>Contact @ example.com</p>"));
}

#[test]
fn preserved_page_keeps_one_line_per_source_line() {
    let minimized = minimize(&fixture("article.html"), false);
    let main = extract(&minimized, Some("<main>"), Some("</main>")).unwrap();
    assert_eq!(
        main.content,
        "<h1>\nHome Page\nHeader\n</h1>\n<p>Tom & Jerry's adventures\ncontinue.</p>\n<ul>\n<li>First</li>\n<li>Second</li>\n</ul>\n"
    );
}

#[test]
fn minimize_is_idempotent_on_a_real_page() {
    let page = fixture("article.html");
    for strip_newlines in [true, false] {
        let once = minimize(&page, strip_newlines);
        assert_eq!(minimize(&once, strip_newlines), once);
    }
}

#[test]
fn header_is_found_despite_template_whitespace() {
    let result = assert_content_contains(
        fixture("article.html"),
        &["Home Page Header", "<li>First</li>"],
        &main_section(),
    );
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn navigation_links_are_outside_main() {
    let err = assert_content_contains(fixture("article.html"), &["About"], &main_section())
        .unwrap_err();
    assert!(matches!(
        err,
        AssertionError::FoundInExcludedSection {
            section: Section::StartsAfter,
            ..
        }
    ));

    let err = assert_content_contains(fixture("article.html"), &["Contact"], &main_section())
        .unwrap_err();
    assert!(matches!(
        err,
        AssertionError::FoundInExcludedSection {
            section: Section::EndsBefore,
            ..
        }
    ));

    assert!(assert_content_excludes(fixture("article.html"), &["About", "Contact"], &main_section()).is_ok());
}

#[test]
fn missing_marker_reports_section_and_marker() {
    let options = AssertOptions::default().with_bounds(Bounds::new().ends_before("<aside>"));
    let err = assert_content_contains(fixture("article.html"), &["Home"], &options).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("content_ends_before"), "{message}");
    assert!(message.contains("<aside>"), "{message}");
}

#[test]
fn encoded_and_literal_pages_are_equal() {
    let encoded = "&lt;p&gt;&#84;om &amp;amp; &#x4A;erry&lt;/p&gt;";
    let literal = "<p>\n    Tom &amp; Jerry\n</p>";
    assert!(assert_content_equals(encoded, literal, &AssertOptions::default()).is_ok());
}

#[test]
fn failed_equality_is_reported_with_a_diff() {
    let mut reporter = Reporter::new(Vec::new(), Palette::plain());
    let result = reporter.check(assert_content_equals(
        "<ul>\n<li>One</li>\n<li>Two</li>\n</ul>",
        "<ul>\n<li>One</li>\n<li>Too</li>\n</ul>\n<p>extra</p>",
        &AssertOptions::default().keep_newlines(),
    ));

    let Err(AssertionError::Mismatch { expected, actual }) = result else {
        panic!("expected a mismatch");
    };
    let rendered = diff::render_with(&expected, &actual, &Palette::plain());
    let report = String::from_utf8(reporter.into_inner()).unwrap();

    assert!(report.contains(&format!("EXPECTED:\n{}\n", rendered.expected)));
    assert!(report.contains(&format!("ACTUAL:\n{}\n", rendered.actual)));
    insta::assert_snapshot!(rendered.actual, @r"
    <ul>
    <li>One</li>
    <li>Too</li>
    </ul>
    <p>extra</p>
    ");
}
