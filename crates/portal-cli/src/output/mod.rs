use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        role: &'static str,
        home: &'static str,
    }

    #[test]
    fn raw_is_single_line() {
        let rendered = render(
            &Sample {
                role: "admin",
                home: "/admin/dashboard",
            },
            OutputFormat::Raw,
        )
        .unwrap();
        assert_eq!(rendered, r#"{"role":"admin","home":"/admin/dashboard"}"#);
    }

    #[test]
    fn json_is_pretty() {
        let rendered = render(
            &Sample {
                role: "admin",
                home: "/",
            },
            OutputFormat::Json,
        )
        .unwrap();
        assert!(rendered.contains("\n  \"role\": \"admin\""));
    }
}
