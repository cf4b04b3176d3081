pub mod digest;
pub mod elements;
pub mod html2text;
pub mod ical;
pub mod text;
pub mod tokenizer;

use sift_core::{AutoRule, FilterError, FilterRegistry, RegistryBuilder, register_rules};

pub use elements::extract_element;
pub use html2text::HtmdConverter;
pub use tokenizer::Html5Tokenizer;

/// Register every built-in filter unit.
pub fn register_builtins(builder: &mut RegistryBuilder) -> Result<(), FilterError> {
    builder
        .register("html2text", "Convert HTML to plaintext", html2text::create)?
        .register("ical2text", "Convert iCalendar to plaintext", ical::create)?
        .register("grep", "Filter only lines matching a regular expression", text::grep)?
        .register(
            "grepi",
            "Filter which removes lines matching a regular expression",
            text::grepi,
        )?
        .register("strip", "Strip leading and trailing whitespace", text::strip)?
        .register("element-by-id", "Get an HTML element by its ID", elements::element_by_id)?
        .register(
            "element-by-class",
            "Get an HTML element by its class",
            elements::element_by_class,
        )?
        .register(
            "element-by-style",
            "Get an HTML element by its style",
            elements::element_by_style,
        )?
        .register("element-by-tag", "Get an HTML element by its tag", elements::element_by_tag)?
        .register("sha1sum", "Calculate the SHA-1 checksum of the content", digest::sha1sum)?
        .register("hexdump", "Convert binary data to hex dump format", digest::hex_dump)?;
    Ok(())
}

/// Registry with the built-in units and the given auto-match rules.
pub fn build_registry(rules: Vec<AutoRule>) -> Result<FilterRegistry, FilterError> {
    let mut builder = FilterRegistry::builder();
    register_builtins(&mut builder)?;
    register_rules(&mut builder, rules)?;
    Ok(builder.build())
}
