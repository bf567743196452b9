//! Filename generation from wildcard templates.
//!
//! Template syntax: `{field}` or `{field:param}`, where the fields are
//! `originalName`, `index`, `extension`, and `originalLocation`. Literal
//! braces are written `{{` and `}}`. The only defined field parameter is
//! a zero-padding width on `index`, e.g. `{index:3}` renders `7` as
//! `007`.

use conch_dispatch::collab::{NameFields, NameTemplate, TemplateError};

/// [`NameTemplate`] implementation of the wildcard micro-language.
#[derive(Debug, Default, Clone, Copy)]
pub struct WildcardTemplate;

impl WildcardTemplate {
    pub fn new() -> Self {
        Self
    }
}

impl NameTemplate for WildcardTemplate {
    fn render(&self, template: &str, fields: &NameFields<'_>) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    if chars.peek() == Some(&'{') {
                        chars.next();
                        out.push('{');
                        continue;
                    }
                    let mut field = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(inner) => field.push(inner),
                            None => return Err(TemplateError::UnterminatedField),
                        }
                    }
                    out.push_str(&expand(&field, fields)?);
                }
                '}' => {
                    if chars.peek() == Some(&'}') {
                        chars.next();
                    }
                    out.push('}');
                }
                c => out.push(c),
            }
        }

        Ok(out)
    }
}

fn expand(field: &str, fields: &NameFields<'_>) -> Result<String, TemplateError> {
    let (name, param) = match field.split_once(':') {
        Some((name, param)) => (name, Some(param)),
        None => (field, None),
    };

    match name {
        "originalName" => no_param(name, param, fields.original_name.to_string()),
        "extension" => no_param(name, param, fields.extension.to_string()),
        "originalLocation" => no_param(
            name,
            param,
            fields.original_location.display().to_string(),
        ),
        "index" => match param {
            None => Ok(fields.index.to_string()),
            Some(width_spec) => {
                let width: usize =
                    width_spec
                        .parse()
                        .map_err(|_| TemplateError::BadParameter {
                            field: name.to_string(),
                            param: width_spec.to_string(),
                        })?;
                Ok(format!("{:0width$}", fields.index))
            }
        },
        _ => Err(TemplateError::UnknownField {
            field: name.to_string(),
        }),
    }
}

fn no_param(
    name: &str,
    param: Option<&str>,
    value: String,
) -> Result<String, TemplateError> {
    match param {
        None => Ok(value),
        Some(param) => Err(TemplateError::BadParameter {
            field: name.to_string(),
            param: param.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn fields() -> NameFields<'static> {
        NameFields {
            original_name: "report",
            index: 7,
            extension: "txt",
            original_location: Path::new("/data/in"),
        }
    }

    fn render(template: &str) -> Result<String, TemplateError> {
        WildcardTemplate::new().render(template, &fields())
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(render("archive.bin").unwrap(), "archive.bin");
    }

    #[test]
    fn test_field_substitution() {
        assert_eq!(
            render("{originalName}_{index}.{extension}").unwrap(),
            "report_7.txt"
        );
    }

    #[test]
    fn test_location_field() {
        assert_eq!(render("{originalLocation}").unwrap(), "/data/in");
    }

    #[test]
    fn test_index_zero_padding() {
        assert_eq!(render("{index:3}").unwrap(), "007");
        assert_eq!(render("{index:1}").unwrap(), "7");
    }

    #[test]
    fn test_literal_braces() {
        assert_eq!(render("{{literal}}").unwrap(), "{literal}");
        assert_eq!(render("a{{b").unwrap(), "a{b");
    }

    #[test]
    fn test_unknown_field() {
        assert_eq!(
            render("{bogus}"),
            Err(TemplateError::UnknownField {
                field: "bogus".to_string()
            })
        );
    }

    #[test]
    fn test_unterminated_field() {
        assert_eq!(render("{index"), Err(TemplateError::UnterminatedField));
    }

    #[test]
    fn test_bad_parameter() {
        assert_eq!(
            render("{index:wide}"),
            Err(TemplateError::BadParameter {
                field: "index".to_string(),
                param: "wide".to_string()
            })
        );
        assert_eq!(
            render("{extension:3}"),
            Err(TemplateError::BadParameter {
                field: "extension".to_string(),
                param: "3".to_string()
            })
        );
    }
}
