// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_page(sections: usize) -> String {
    let mut page = String::from("<html>\n    <head><title>Bench</title></head>\n    <body>\n");
    for section in 0..sections {
        page.push_str(&format!(
            "        <section id=\"s{section}\">\n            <h2>\n                Section&nbsp;{section}\n            </h2>\n\n            <p>Tom &amp; Jerry&#39;s &#x3C;adventures&#x3E;<br />continue.</p>\n        </section>\n"
        ));
    }
    page.push_str("    </body>\n</html>\n");
    page
}
