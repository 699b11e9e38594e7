#![no_main]

use email_safe_markup::StyleSheet;
use email_safe_markup::spacing::extract_spacing;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(css) = std::str::from_utf8(data) else {
        return;
    };

    let styles = StyleSheet::parse(css);
    for selector in styles.selectors() {
        let declarations = styles.get_style(selector);
        assert!(!declarations.is_empty());
        let _ = extract_spacing(&styles, selector, "0");
    }
});
