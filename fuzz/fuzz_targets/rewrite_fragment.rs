#![no_main]

use email_safe_markup::{EmailMarkupRewriter, RewriteOptions, StyleSheet};
use libfuzzer_sys::fuzz_target;

const CSS: &str = include_str!("../../tests/fixtures/newsletter.css");

fuzz_target!(|data: &[u8]| {
    let Ok(html) = std::str::from_utf8(data) else {
        return;
    };

    let rewriter = EmailMarkupRewriter::with_options(RewriteOptions {
        max_input_size: Some(64 * 1024),
        ..Default::default()
    });
    let _ = rewriter.rewrite(html, &StyleSheet::parse(CSS));
});
