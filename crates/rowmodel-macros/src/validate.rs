//! Compile-time validation for the derive macros.
//!
//! Every check records its error and keeps going, so a single build reports
//! all problems with a model at once.

use std::collections::HashMap;

use proc_macro2::Span;
use syn::Error;
use syn::ext::IdentExt;

use crate::parse::{EnumDef, ModelDef};

/// Validate a parsed model definition.
pub fn validate_model(model: &ModelDef) -> Result<(), Error> {
    let mut errors = Vec::new();

    validate_has_fields(model, &mut errors);
    validate_identifier("table", &model.table_name, model.name.span(), &mut errors);
    validate_identifier("schema", &model.schema, model.name.span(), &mut errors);
    validate_single_key(model, &mut errors);
    validate_field_flags(model, &mut errors);
    validate_key_column(model, &mut errors);
    validate_no_duplicate_columns(model, &mut errors);

    combine(errors)
}

/// Validate a parsed enum definition.
pub fn validate_enum(def: &EnumDef) -> Result<(), Error> {
    let mut errors = Vec::new();

    if def.variants.is_empty() {
        errors.push(Error::new(
            def.name.span(),
            "SqlEnum requires at least one variant",
        ));
    }

    let mut seen: HashMap<String, &syn::Ident> = HashMap::new();
    for variant in &def.variants {
        let text = variant
            .display
            .clone()
            .unwrap_or_else(|| variant.ident.unraw().to_string());
        if let Some(previous) = seen.insert(text.clone(), &variant.ident) {
            errors.push(Error::new(
                variant.ident.span(),
                format!("name '{text}' is already used by variant `{previous}`"),
            ));
        }
    }

    combine(errors)
}

fn combine(mut errors: Vec<Error>) -> Result<(), Error> {
    if errors.is_empty() {
        return Ok(());
    }
    let mut combined = errors.remove(0);
    for err in errors {
        combined.combine(err);
    }
    Err(combined)
}

/// Validate that the struct has at least one field.
fn validate_has_fields(model: &ModelDef, errors: &mut Vec<Error>) {
    if model.fields.is_empty() {
        errors.push(Error::new(
            model.name.span(),
            "Model struct must have at least one field",
        ));
    }
}

/// Validate a bracket-quoted identifier.
fn validate_identifier(kind: &str, name: &str, span: Span, errors: &mut Vec<Error>) {
    const DANGEROUS_CHARS: &[char] = &['[', ']', ';', '\'', '\0', '\n', '\r'];

    if name.trim().is_empty() {
        errors.push(Error::new(
            span,
            format!("{kind} name cannot be empty or whitespace"),
        ));
        return;
    }

    if let Some(ch) = name.chars().find(|c| DANGEROUS_CHARS.contains(c)) {
        errors.push(Error::new(
            span,
            format!("{kind} name contains invalid character '{}'", ch.escape_default()),
        ));
    }
}

/// At most one key field per type.
fn validate_single_key(model: &ModelDef, errors: &mut Vec<Error>) {
    let mut keys = model.fields.iter().filter(|f| f.primary_key);
    let Some(first) = keys.next() else {
        return;
    };
    for extra in keys {
        errors.push(Error::new(
            extra.name.span(),
            format!(
                "a model can have only one key field; `{}` is already the key",
                first.name
            ),
        ));
    }
}

/// Reject flag combinations that cannot be honored.
fn validate_field_flags(model: &ModelDef, errors: &mut Vec<Error>) {
    for field in &model.fields {
        if field.primary_key && field.skip {
            errors.push(Error::new(
                field.name.span(),
                "the key field cannot be skipped",
            ));
        }
        if field.primary_key && field.write_only {
            errors.push(Error::new(
                field.name.span(),
                "the key field must be readable; remove `write_only`",
            ));
        }
        if field.primary_key && field.read_only {
            errors.push(Error::new(
                field.name.span(),
                "the key field must be assignable to receive its generated value; remove `read_only`",
            ));
        }
        if field.read_only && field.write_only {
            errors.push(Error::new(
                field.name.span(),
                "a field cannot be both `read_only` and `write_only`",
            ));
        }
    }
}

/// The key column is written unquoted after `OUTPUT INSERTED.`.
fn validate_key_column(model: &ModelDef, errors: &mut Vec<Error>) {
    let Some(key) = model.fields.iter().find(|f| f.primary_key) else {
        return;
    };
    let name = key.column_name.as_str();
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !plain {
        errors.push(Error::new(
            key.name.span(),
            format!("key column '{name}' must be a plain identifier (letters, digits, `_`)"),
        ));
    }
}

/// No two mapped fields may share a column name, ignoring case.
fn validate_no_duplicate_columns(model: &ModelDef, errors: &mut Vec<Error>) {
    let mut seen: HashMap<String, &syn::Ident> = HashMap::new();

    for field in &model.fields {
        if field.skip {
            continue;
        }

        if let Some(previous) = seen.insert(field.column_name.to_lowercase(), &field.name) {
            errors.push(Error::new(
                field.name.span(),
                format!(
                    "duplicate column name '{}'; field `{}` already maps to this column",
                    field.column_name, previous
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_enum, parse_model};
    use syn::{DeriveInput, parse_quote};

    fn model_errors(input: &DeriveInput) -> Option<String> {
        let model = parse_model(input).unwrap();
        validate_model(&model).err().map(|e| {
            e.into_iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    #[test]
    fn valid_model_passes() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[rowmodel(key)]
                id: i64,
                name: String,
                #[rowmodel(skip)]
                cache: String,
            }
        };
        assert!(model_errors(&input).is_none());
    }

    #[test]
    fn two_keys_are_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Pair {
                #[rowmodel(key)]
                left: i64,
                #[rowmodel(key)]
                right: i64,
            }
        };
        let msg = model_errors(&input).unwrap();
        assert!(msg.contains("only one key field"));
    }

    #[test]
    fn skipped_key_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[rowmodel(key, skip)]
                id: i64,
            }
        };
        assert!(model_errors(&input).unwrap().contains("cannot be skipped"));
    }

    #[test]
    fn duplicate_columns_ignore_case() {
        let input: DeriveInput = parse_quote! {
            struct User {
                name: String,
                #[rowmodel(column = "NAME")]
                display_name: String,
            }
        };
        assert!(model_errors(&input).unwrap().contains("duplicate column name"));
    }

    #[test]
    fn skipped_fields_do_not_collide() {
        let input: DeriveInput = parse_quote! {
            struct User {
                name: String,
                #[rowmodel(skip, column = "name")]
                shadow: String,
            }
        };
        assert!(model_errors(&input).is_none());
    }

    #[test]
    fn errors_are_combined() {
        let input: DeriveInput = parse_quote! {
            #[rowmodel(table = "bad]name")]
            struct User {
                #[rowmodel(read_only, write_only)]
                name: String,
                #[rowmodel(column = "Name")]
                other: String,
            }
        };
        let msg = model_errors(&input).unwrap();
        assert!(msg.contains("invalid character"));
        assert!(msg.contains("both `read_only` and `write_only`"));
        assert!(msg.contains("duplicate column name"));
    }

    #[test]
    fn read_only_key_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Order {
                #[rowmodel(key, read_only)]
                id: i64,
                total: i64,
            }
        };
        assert!(model_errors(&input).unwrap().contains("remove `read_only`"));
    }

    #[test]
    fn key_column_must_be_a_plain_identifier() {
        let input: DeriveInput = parse_quote! {
            struct Order {
                #[rowmodel(key, column = "Row Id")]
                id: i64,
                total: i64,
            }
        };
        assert!(model_errors(&input).unwrap().contains("plain identifier"));

        let input: DeriveInput = parse_quote! {
            struct Order {
                #[rowmodel(key, column = "Order_Id2")]
                id: i64,
                #[rowmodel(column = "Grand Total")]
                total: i64,
            }
        };
        assert!(model_errors(&input).is_none());
    }

    #[test]
    fn raw_variant_names_compare_unraw() {
        let input: DeriveInput = parse_quote! {
            enum Kind {
                r#type,
                #[rowmodel(display = "type")]
                Other,
            }
        };
        let def = parse_enum(&input).unwrap();
        let msg = validate_enum(&def).unwrap_err().to_string();
        assert!(msg.contains("name 'type' is already used"));
    }

    #[test]
    fn enum_display_names_must_be_unique() {
        let input: DeriveInput = parse_quote! {
            enum Status {
                #[rowmodel(display = "Inactive")]
                Active,
                Inactive,
            }
        };
        let def = parse_enum(&input).unwrap();
        assert!(validate_enum(&def).is_err());
    }
}
