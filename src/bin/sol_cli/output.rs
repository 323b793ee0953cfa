//! Output formatting for the sol-sandbox CLI
//!
//! Human-readable and JSON renderings for every command.

use serde::Serialize;

use sol_sandbox::{DeclaredEnum, EnumIndexMapping};

/// Format one enum as an index table.
pub fn format_enum(name: &str, mapping: &EnumIndexMapping) -> String {
    let mut out = format!(
        "\x1b[1m{}\x1b[0m ({} member{})\n",
        name,
        mapping.len(),
        if mapping.len() == 1 { "" } else { "s" }
    );
    let width = mapping.len().saturating_sub(1).to_string().len();
    for (index, member) in mapping.members().iter().enumerate() {
        out.push_str(&format!("  {:>width$}  {}\n", index, member, width = width));
    }
    out
}

/// Format every enum of a source file.
pub fn format_enum_list(contract: &str, enums: &[DeclaredEnum]) -> String {
    if enums.is_empty() {
        return format!("No enums declared in the source of {}\n", contract);
    }
    let mut out = String::new();
    for (idx, declared) in enums.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&format_enum(&declared.name, &declared.mapping));
    }
    out
}

pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Format an error for display
pub fn format_error(error: &anyhow::Error, json_output: bool) -> String {
    if json_output {
        #[derive(Serialize)]
        struct ErrorJson {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            kind: Option<&'static str>,
        }

        let kind = error
            .downcast_ref::<sol_sandbox::ResolveError>()
            .map(|err| if err.is_not_found() { "not_found" } else { "lookup" });
        let err = ErrorJson {
            error: format!("{:#}", error),
            kind,
        };
        serde_json::to_string_pretty(&err).unwrap_or_else(|_| "{}".to_string())
    } else {
        let mut out = format!("\x1b[31mError:\x1b[0m {}\n", error);
        let mut causes = error.chain().skip(1).peekable();
        if causes.peek().is_some() {
            out.push_str("Caused by:\n");
            for (idx, cause) in causes.enumerate() {
                out.push_str(&format!("  {}: {}\n", idx + 1, cause));
            }
        }
        out
    }
}
