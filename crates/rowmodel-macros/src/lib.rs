//! Procedural macros for rowmodel.
//!
//! `rowmodel-macros` is the **compile-time registration layer**. It turns Rust
//! structs and enums into mapped types by generating static metadata and
//! by-name field access, so no runtime introspection is needed.
//!
//! - `#[derive(Model)]` produces a `Model` implementation (table, schema,
//!   field descriptors, getters and setters) plus `FromRow`.
//! - `#[derive(SqlEnum)]` produces ordinal and name lookup for unit enums,
//!   their coercion rule, and their conversion into `Value`.
//!
//! These macros are used by application crates via the `rowmodel` facade.

use proc_macro::TokenStream;
use syn::ext::IdentExt;

mod parse;
mod validate;

use parse::{EnumDef, ModelDef, parse_enum, parse_model};

/// Derive macro for the `Model` trait.
///
/// # Attributes
///
/// - `#[rowmodel(table = "name")]` - Override table name (defaults to the struct name)
/// - `#[rowmodel(schema = "name")]` - Override schema (defaults to `dbo`)
/// - `#[rowmodel(key)]` - Mark field as the key (`primary_key` is accepted too)
/// - `#[rowmodel(column = "name")]` - Override column name
/// - `#[rowmodel(skip)]` - Not mapped in either direction
/// - `#[rowmodel(read_only)]` - Written to SQL but never assigned from rows
/// - `#[rowmodel(write_only)]` - Assigned from rows but never written to SQL
///
/// The struct must implement `Default`, readable fields must be `Clone` and
/// convert into `Value`, and assignable fields must implement `FromSql`.
///
/// # Example
///
/// ```ignore
/// use rowmodel::Model;
///
/// #[derive(Model, Default, Clone)]
/// struct User {
///     #[rowmodel(key, column = "Id")]
///     id: i64,
///     #[rowmodel(column = "Name")]
///     name: String,
///     #[rowmodel(column = "Active")]
///     active: bool,
///     #[rowmodel(skip)]
///     session_token: Option<Vec<u8>>,
/// }
/// ```
#[proc_macro_derive(Model, attributes(rowmodel))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    // Parse the struct and its attributes
    let model = match parse_model(&input) {
        Ok(m) => m,
        Err(e) => return e.to_compile_error().into(),
    };

    // Validate the parsed model
    if let Err(e) = validate::validate_model(&model) {
        return e.to_compile_error().into();
    }

    generate_model_impl(&model).into()
}

/// Generate the Model and FromRow implementations.
fn generate_model_impl(model: &ModelDef) -> proc_macro2::TokenStream {
    let name = &model.name;
    let table_name = &model.table_name;
    let schema = &model.schema;
    let (impl_generics, ty_generics, where_clause) = model.generics.split_for_impl();

    let field_infos = generate_field_infos(model);
    let field_value = generate_field_value(model);
    let set_field = generate_set_field(model);

    quote::quote! {
        impl #impl_generics rowmodel_core::Model for #name #ty_generics #where_clause {
            const TABLE_NAME: &'static str = #table_name;
            const SCHEMA: &'static str = #schema;

            fn fields() -> &'static [rowmodel_core::FieldInfo] {
                static FIELDS: &[rowmodel_core::FieldInfo] = &[#(#field_infos),*];
                FIELDS
            }

            fn field_value(&self, field: &str) -> Option<rowmodel_core::Value> {
                #field_value
            }

            fn set_field(
                &mut self,
                field: &str,
                value: &rowmodel_core::Value,
            ) -> rowmodel_core::Result<()> {
                #set_field
            }
        }

        impl #impl_generics rowmodel_core::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &rowmodel_core::Row) -> rowmodel_core::Result<Self> {
                rowmodel_core::materialize::<Self>(row)
            }
        }
    }
}

/// One const `FieldInfo` builder chain per declared field.
fn generate_field_infos(model: &ModelDef) -> Vec<proc_macro2::TokenStream> {
    model
        .fields
        .iter()
        .map(|field| {
            let field_name = field.name.unraw().to_string();
            let column_name = &field.column_name;

            let mut chain = quote::quote! {
                rowmodel_core::FieldInfo::new(#field_name).column(#column_name)
            };
            if field.primary_key {
                chain = quote::quote! { #chain.key() };
            }
            if field.skip {
                chain = quote::quote! { #chain.skip() };
            }
            if field.read_only {
                chain = quote::quote! { #chain.read_only() };
            }
            if field.write_only {
                chain = quote::quote! { #chain.write_only() };
            }
            chain
        })
        .collect()
}

/// Generate the `field_value` body: a match over readable fields.
fn generate_field_value(model: &ModelDef) -> proc_macro2::TokenStream {
    let arms = model.readable_fields().map(|field| {
        let ident = &field.name;
        let field_name = ident.unraw().to_string();
        quote::quote! {
            #field_name => Some(rowmodel_core::Value::from(
                ::core::clone::Clone::clone(&self.#ident)
            ))
        }
    });

    quote::quote! {
        match field {
            #(#arms,)*
            _ => None,
        }
    }
}

/// Generate the `set_field` body: coerce and assign, or report the field.
fn generate_set_field(model: &ModelDef) -> proc_macro2::TokenStream {
    let table_name = &model.table_name;
    let arms = model.assignable_fields().map(|field| {
        let ident = &field.name;
        let ty = &field.ty;
        let field_name = ident.unraw().to_string();
        quote::quote! {
            #field_name => {
                self.#ident = rowmodel_core::coerce::<#ty>(field, value)?;
            }
        }
    });

    quote::quote! {
        match field {
            #(#arms)*
            _ => {
                return Err(rowmodel_core::Error::Custom(format!(
                    "{} has no assignable field '{}'",
                    #table_name,
                    field
                )));
            }
        }
        Ok(())
    }
}

/// Derive macro for enums persisted as integer ordinals.
///
/// Generates `SqlEnum`, the `FromSql` coercion rule, and `From<Enum> for
/// Value` (as `Value::Enum(ordinal)`). Ordinals are the variants'
/// discriminants, so explicit values such as `Active = 1` are honored.
///
/// When reading text, a variant matches its `#[rowmodel(display = "...")]`
/// name if one is declared, otherwise its symbolic name.
///
/// Enum fields on a `Model` also need `Default` and `Clone`.
///
/// # Example
///
/// ```ignore
/// #[derive(SqlEnum, Debug, Default, Clone, Copy, PartialEq)]
/// enum Status {
///     #[default]
///     #[rowmodel(display = "Currently Active")]
///     Active = 1,
///     Inactive = 2,
/// }
/// ```
#[proc_macro_derive(SqlEnum, attributes(rowmodel))]
pub fn derive_sql_enum(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    let def = match parse_enum(&input) {
        Ok(d) => d,
        Err(e) => return e.to_compile_error().into(),
    };

    if let Err(e) = validate::validate_enum(&def) {
        return e.to_compile_error().into();
    }

    generate_sql_enum_impl(&def).into()
}

fn generate_sql_enum_impl(def: &EnumDef) -> proc_macro2::TokenStream {
    let name = &def.name;
    let type_name = name.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = def.generics.split_for_impl();

    let variant_infos = def.variants.iter().map(|v| {
        let ident = &v.ident;
        let symbolic = ident.unraw().to_string();
        let base = quote::quote! {
            rowmodel_core::EnumVariant::new(#symbolic, #name::#ident as i64)
        };
        match &v.display {
            Some(display) => quote::quote! { #base.display(#display) },
            None => base,
        }
    });

    let to_ordinal_arms = def.variants.iter().map(|v| {
        let ident = &v.ident;
        quote::quote! { #name::#ident => #name::#ident as i64 }
    });

    let from_ordinal_arms = def.variants.iter().map(|v| {
        let ident = &v.ident;
        quote::quote! { o if o == #name::#ident as i64 => Some(#name::#ident) }
    });

    quote::quote! {
        impl #impl_generics rowmodel_core::SqlEnum for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;
            const VARIANTS: &'static [rowmodel_core::EnumVariant] = &[#(#variant_infos),*];

            fn ordinal(&self) -> i64 {
                match self {
                    #(#to_ordinal_arms,)*
                }
            }

            fn from_ordinal(ordinal: i64) -> Option<Self> {
                match ordinal {
                    #(#from_ordinal_arms,)*
                    _ => None,
                }
            }
        }

        impl #impl_generics rowmodel_core::FromSql for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;

            fn from_sql(
                value: &rowmodel_core::Value,
            ) -> Option<rowmodel_core::Result<Self>> {
                rowmodel_core::enum_from_value::<Self>(value)
            }
        }

        impl #impl_generics From<#name #ty_generics> for rowmodel_core::Value #where_clause {
            fn from(v: #name #ty_generics) -> Self {
                rowmodel_core::Value::Enum(rowmodel_core::SqlEnum::ordinal(&v))
            }
        }

        impl #impl_generics From<&#name #ty_generics> for rowmodel_core::Value #where_clause {
            fn from(v: &#name #ty_generics) -> Self {
                rowmodel_core::Value::Enum(rowmodel_core::SqlEnum::ordinal(v))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{DeriveInput, parse_quote};

    fn model_tokens(input: &DeriveInput) -> String {
        let model = parse_model(input).unwrap();
        generate_model_impl(&model).to_string()
    }

    #[test]
    fn model_impl_carries_table_and_schema() {
        let input: DeriveInput = parse_quote! {
            #[rowmodel(schema = "sales")]
            struct Order {
                #[rowmodel(key)]
                id: i64,
            }
        };
        let tokens = model_tokens(&input);
        assert!(tokens.contains("\"Order\""));
        assert!(tokens.contains("\"sales\""));
        assert!(tokens.contains("FromRow"));
    }

    #[test]
    fn field_infos_chain_flags() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[rowmodel(key, column = "Id")]
                id: i64,
                #[rowmodel(skip)]
                cache: String,
            }
        };
        let model = parse_model(&input).unwrap();
        let infos: Vec<String> = generate_field_infos(&model)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert!(infos[0].contains("\"Id\""));
        assert!(infos[0].contains("key ()"));
        assert!(infos[1].contains("skip ()"));
    }

    #[test]
    fn skipped_fields_have_no_accessors() {
        let input: DeriveInput = parse_quote! {
            struct User {
                name: String,
                #[rowmodel(skip)]
                cache: NotConvertible,
            }
        };
        let model = parse_model(&input).unwrap();
        let getter = generate_field_value(&model).to_string();
        let setter = generate_set_field(&model).to_string();
        assert!(getter.contains("\"name\""));
        assert!(!getter.contains("\"cache\""));
        assert!(!setter.contains("NotConvertible"));
    }

    #[test]
    fn enum_impl_uses_discriminants_and_display() {
        let input: DeriveInput = parse_quote! {
            enum Status {
                #[rowmodel(display = "Currently Active")]
                Active = 1,
                Inactive = 2,
            }
        };
        let def = parse_enum(&input).unwrap();
        let tokens = generate_sql_enum_impl(&def).to_string();
        assert!(tokens.contains("\"Currently Active\""));
        assert!(tokens.contains("Status :: Inactive as i64"));
        assert!(tokens.contains("Value :: Enum"));
    }
}
