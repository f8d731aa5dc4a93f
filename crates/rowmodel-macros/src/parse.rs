//! Parsing logic for the derive macros.
//!
//! This module extracts struct-level, field-level and variant-level
//! `#[rowmodel(...)]` attributes to build the definitions used for code
//! generation.

use proc_macro2::Span;
use syn::{Attribute, Data, DeriveInput, Error, Field, Fields, Generics, Ident, Lit, Result, Type};

/// Schema used when none is declared.
pub const DEFAULT_SCHEMA: &str = "dbo";

/// Parsed model definition from a struct with `#[derive(Model)]`.
#[derive(Debug)]
pub struct ModelDef {
    /// The struct name (e.g., `User`).
    pub name: Ident,
    /// The SQL table name (the struct name unless overridden).
    pub table_name: String,
    /// The SQL schema name.
    pub schema: String,
    /// Parsed field definitions, in declaration order.
    pub fields: Vec<FieldDef>,
    /// Generic parameters from the struct.
    pub generics: Generics,
}

impl ModelDef {
    /// Fields the generated getter exposes.
    pub fn readable_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| !f.skip && !f.write_only)
    }

    /// Fields the generated setter can assign.
    pub fn assignable_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| !f.skip && !f.read_only)
    }
}

/// Parsed field definition from a struct field.
#[derive(Debug)]
pub struct FieldDef {
    /// The Rust field name.
    pub name: Ident,
    /// The SQL column name (the field name unless overridden).
    pub column_name: String,
    /// The Rust type of the field.
    pub ty: Type,
    /// Whether this field is the key.
    pub primary_key: bool,
    /// Not mapped in either direction.
    pub skip: bool,
    /// Never assigned from a row.
    pub read_only: bool,
    /// Never read into SQL.
    pub write_only: bool,
}

/// Parsed enum definition from `#[derive(SqlEnum)]`.
#[derive(Debug)]
pub struct EnumDef {
    /// The enum name.
    pub name: Ident,
    /// Unit variants, in declaration order.
    pub variants: Vec<VariantDef>,
    /// Generic parameters from the enum.
    pub generics: Generics,
}

/// Parsed enum variant.
#[derive(Debug)]
pub struct VariantDef {
    /// The variant identifier.
    pub ident: Ident,
    /// Display-name override used when reading text.
    pub display: Option<String>,
}

/// Parse a `#[derive(Model)]` input.
pub fn parse_model(input: &DeriveInput) -> Result<ModelDef> {
    let name = input.ident.clone();
    let generics = input.generics.clone();

    let StructAttrs { table_name, schema } = parse_struct_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => parse_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Model can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Model can only be derived for structs, not unions",
            ));
        }
    };

    Ok(ModelDef {
        table_name: table_name.unwrap_or_else(|| name.to_string()),
        schema: schema.unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
        name,
        fields,
        generics,
    })
}

/// Parsed struct-level attributes result.
struct StructAttrs {
    table_name: Option<String>,
    schema: Option<String>,
}

/// Parse struct-level `#[rowmodel(...)]` attributes.
///
/// Supported keys:
/// - `table = "name"` (overrides the struct name)
/// - `schema = "name"` (overrides `dbo`)
fn parse_struct_attrs(attrs: &[Attribute]) -> Result<StructAttrs> {
    let mut table_name = None;
    let mut schema = None;

    for attr in attrs {
        if !attr.path().is_ident("rowmodel") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                table_name = Some(parse_str_value(&meta, "table name")?);
            } else if meta.path.is_ident("schema") {
                schema = Some(parse_str_value(&meta, "schema name")?);
            } else {
                return Err(meta.error(
                    "unknown rowmodel struct attribute; expected `table` or `schema`",
                ));
            }
            Ok(())
        })?;
    }

    Ok(StructAttrs { table_name, schema })
}

fn parse_str_value(meta: &syn::meta::ParseNestedMeta<'_>, what: &str) -> Result<String> {
    let value: Lit = meta.value()?.parse()?;
    match value {
        Lit::Str(lit_str) => Ok(lit_str.value()),
        other => Err(Error::new_spanned(
            other,
            format!("expected string literal for {what}"),
        )),
    }
}

/// Parse all fields from a struct.
fn parse_fields(fields: &Fields) -> Result<Vec<FieldDef>> {
    match fields {
        Fields::Named(named) => named.named.iter().map(parse_field).collect(),
        Fields::Unnamed(_) => Err(Error::new(
            Span::call_site(),
            "Model requires a struct with named fields, not a tuple struct",
        )),
        Fields::Unit => Err(Error::new(
            Span::call_site(),
            "Model requires a struct with fields, not a unit struct",
        )),
    }
}

/// Parse a single field and its attributes.
fn parse_field(field: &Field) -> Result<FieldDef> {
    let name = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;

    let attrs = parse_field_attrs(&field.attrs)?;

    // Column name defaults to the field name without any raw prefix
    let column_name = attrs
        .column
        .unwrap_or_else(|| syn::ext::IdentExt::unraw(&name).to_string());

    Ok(FieldDef {
        name,
        column_name,
        ty: field.ty.clone(),
        primary_key: attrs.primary_key,
        skip: attrs.skip,
        read_only: attrs.read_only,
        write_only: attrs.write_only,
    })
}

/// Intermediate struct for collecting field attributes.
#[derive(Default)]
struct FieldAttrs {
    column: Option<String>,
    primary_key: bool,
    skip: bool,
    read_only: bool,
    write_only: bool,
}

/// Parse all `#[rowmodel(...)]` attributes on a field.
fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("rowmodel") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let path = &meta.path;

            if path.is_ident("key") || path.is_ident("primary_key") {
                result.primary_key = true;
            } else if path.is_ident("skip") {
                result.skip = true;
            } else if path.is_ident("read_only") {
                result.read_only = true;
            } else if path.is_ident("write_only") {
                result.write_only = true;
            } else if path.is_ident("column") {
                result.column = Some(parse_str_value(&meta, "column name")?);
            } else {
                return Err(meta.error(
                    "unknown rowmodel field attribute; expected one of \
                     `key`, `skip`, `column`, `read_only`, `write_only`",
                ));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

/// Parse a `#[derive(SqlEnum)]` input.
pub fn parse_enum(input: &DeriveInput) -> Result<EnumDef> {
    let Data::Enum(data) = &input.data else {
        return Err(Error::new_spanned(
            input,
            "SqlEnum can only be derived for enums",
        ));
    };

    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !variant.fields.is_empty() {
            return Err(Error::new_spanned(
                variant,
                "SqlEnum variants must be unit variants (no fields)",
            ));
        }

        let mut display = None;
        for attr in &variant.attrs {
            if !attr.path().is_ident("rowmodel") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("display") {
                    display = Some(parse_str_value(&meta, "display name")?);
                    Ok(())
                } else {
                    Err(meta.error("unknown rowmodel variant attribute; expected `display`"))
                }
            })?;
        }

        variants.push(VariantDef {
            ident: variant.ident.clone(),
            display,
        });
    }

    Ok(EnumDef {
        name: input.ident.clone(),
        variants,
        generics: input.generics.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn table_defaults_to_struct_name() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[rowmodel(key)]
                id: i64,
                name: String,
            }
        };
        let model = parse_model(&input).unwrap();
        assert_eq!(model.table_name, "User");
        assert_eq!(model.schema, "dbo");
        assert!(model.fields[0].primary_key);
        assert_eq!(model.fields[1].column_name, "name");
    }

    #[test]
    fn struct_overrides() {
        let input: DeriveInput = parse_quote! {
            #[rowmodel(table = "Users", schema = "sales")]
            struct User {
                #[rowmodel(column = "FullName")]
                name: String,
            }
        };
        let model = parse_model(&input).unwrap();
        assert_eq!(model.table_name, "Users");
        assert_eq!(model.schema, "sales");
        assert_eq!(model.fields[0].column_name, "FullName");
    }

    #[test]
    fn field_flags() {
        let input: DeriveInput = parse_quote! {
            struct Account {
                #[rowmodel(primary_key)]
                id: i32,
                #[rowmodel(skip)]
                scratch: Vec<String>,
                #[rowmodel(read_only)]
                total: i64,
                #[rowmodel(write_only)]
                password: String,
                r#type: String,
            }
        };
        let model = parse_model(&input).unwrap();
        assert!(model.fields[1].skip);
        assert!(model.fields[2].read_only);
        assert!(model.fields[3].write_only);
        assert_eq!(model.fields[4].column_name, "type");

        let readable: Vec<_> = model.readable_fields().map(|f| f.name.to_string()).collect();
        assert_eq!(readable, vec!["id", "total", "r#type"]);
        let assignable: Vec<_> = model
            .assignable_fields()
            .map(|f| f.name.to_string())
            .collect();
        assert_eq!(assignable, vec!["id", "password", "r#type"]);
    }

    #[test]
    fn unknown_attribute_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[rowmodel(nullable)]
                name: String,
            }
        };
        assert!(parse_model(&input).is_err());
    }

    #[test]
    fn tuple_structs_and_enums_are_rejected() {
        let tuple: DeriveInput = parse_quote! { struct Pair(i32, i32); };
        assert!(parse_model(&tuple).is_err());

        let e: DeriveInput = parse_quote! { enum E { A } };
        assert!(parse_model(&e).is_err());
    }

    #[test]
    fn enum_variants_and_display() {
        let input: DeriveInput = parse_quote! {
            enum Status {
                #[rowmodel(display = "Currently Active")]
                Active = 1,
                Inactive = 2,
            }
        };
        let def = parse_enum(&input).unwrap();
        assert_eq!(def.variants.len(), 2);
        assert_eq!(def.variants[0].display.as_deref(), Some("Currently Active"));
        assert_eq!(def.variants[1].display, None);
    }

    #[test]
    fn enum_with_data_is_rejected() {
        let input: DeriveInput = parse_quote! {
            enum Shape { Circle(f64) }
        };
        assert!(parse_enum(&input).is_err());
    }
}
