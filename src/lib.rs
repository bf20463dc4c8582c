pub mod error;
pub mod ir;
pub mod prisma;
pub mod sql;

use wasm_bindgen::prelude::*;

pub use error::{ConvertError, ParseError};
pub use ir::Schema;
pub use prisma::{GeneratorOptions, generate, generate_with_options};
pub use sql::{parse, parse_with_diagnostics};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Convert SQL DDL to a Prisma schema with default options.
pub fn convert(source: &str) -> Result<String, ConvertError> {
    convert_with_options(source, &GeneratorOptions::default())
}

/// Convert SQL DDL to a Prisma schema. Input yielding neither tables nor
/// enums is an error.
pub fn convert_with_options(
    source: &str,
    options: &GeneratorOptions,
) -> Result<String, ConvertError> {
    let schema = parse(source);
    if schema.is_empty() {
        return Err(ConvertError::NoDefinitions);
    }
    Ok(generate_with_options(&schema, options))
}

/// Convert SQL DDL to a Prisma schema
#[wasm_bindgen(js_name = "sqlToPrisma")]
pub fn sql_to_prisma(source: &str) -> Result<String, JsValue> {
    convert(source).map_err(|e| js_sys::Error::new(&e.to_string()).into())
}
