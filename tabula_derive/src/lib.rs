use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::{parse_macro_input, parse_quote, Attribute, DeriveInput, Field, GenericParam, LitStr, Token};

#[derive(Clone, Copy)]
enum RenameRule {
    PascalCase,
    CamelCase,
    SnakeCase,
    ScreamingSnakeCase,
}

impl RenameRule {
    fn from_lit(lit: &LitStr) -> syn::Result<Self> {
        match lit.value().as_str() {
            "PascalCase" => Ok(RenameRule::PascalCase),
            "camelCase" => Ok(RenameRule::CamelCase),
            "snake_case" => Ok(RenameRule::SnakeCase),
            "SCREAMING_SNAKE_CASE" => Ok(RenameRule::ScreamingSnakeCase),
            _ => Err(syn::Error::new(
                lit.span(),
                "expected one of PascalCase, camelCase, snake_case, SCREAMING_SNAKE_CASE",
            )),
        }
    }

    fn apply(self, field: &str) -> String {
        match self {
            RenameRule::SnakeCase => field.to_string(),
            RenameRule::ScreamingSnakeCase => field.to_ascii_uppercase(),
            RenameRule::PascalCase => pascal_case(field),
            RenameRule::CamelCase => {
                let pascal = pascal_case(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => pascal,
                }
            }
        }
    }
}

fn pascal_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = true;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    aliases: Vec<String>,
    serde_aliases: Vec<String>,
    skip: bool,
}

/// Consumes an attribute argument that is of no interest
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta(&inner))?;
    }
    Ok(())
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();
    for attr in attrs {
        if attr.path().is_ident("tabula") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    result.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("alias") {
                    result.aliases.push(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("skip") {
                    result.skip = true;
                } else {
                    return Err(meta.error("unknown tabula field attribute"));
                }
                Ok(())
            })?;
        } else if attr.path().is_ident("serde") {
            // serde attributes belong to serde, anything unknown is ignored
            attr.parse_nested_meta(|meta| {
                let named = meta.path.is_ident("rename") || meta.path.is_ident("alias");
                if named && meta.input.peek(Token![=]) {
                    let name = meta.value()?.parse::<LitStr>()?;
                    result.serde_aliases.push(name.value());
                } else if meta.path.is_ident("rename") && meta.input.peek(syn::token::Paren) {
                    meta.parse_nested_meta(|inner| {
                        if inner.path.is_ident("deserialize") {
                            let name = inner.value()?.parse::<LitStr>()?;
                            result.serde_aliases.push(name.value());
                            Ok(())
                        } else {
                            skip_meta(&inner)
                        }
                    })?;
                } else {
                    skip_meta(&meta)?;
                }
                Ok(())
            })?;
        }
    }

    Ok(result)
}

fn parse_rename_all(attrs: &[Attribute]) -> syn::Result<Option<RenameRule>> {
    let mut result = None;
    for attr in attrs.iter().filter(|x| x.path().is_ident("tabula")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let lit = meta.value()?.parse::<LitStr>()?;
                result = Some(RenameRule::from_lit(&lit)?);
                Ok(())
            } else {
                Err(meta.error("unknown tabula container attribute"))
            }
        })?;
    }
    Ok(result)
}

struct RecordField<'a> {
    field: &'a Field,
    column: String,
    attrs: FieldAttrs,
}

/// Creates the `Record` and `CellValue` implementations of a struct
///
/// ```rust
/// use tabula_derive::Record;
///
/// #[derive(Default, Record)]
/// #[tabula(rename_all = "PascalCase")]
/// pub struct ItemCfg {
///     cfg_id: i32,
///     #[tabula(rename = "DisplayName", alias = "name")]
///     title: String,
///     #[tabula(skip)]
///     cache: Vec<u8>,
///     #[serde(rename = "item_count")]
///     count: Option<u32>,
/// }
/// ```
///
/// Every field is addressed by its name, after any `rename_all` rule or
/// field `rename` is applied, and its type must implement `CellValue`.
///
/// Supported attributes:
///
/// - `#[tabula(rename_all = "...")]` on the struct: one of `PascalCase`,
///   `camelCase`, `snake_case`, `SCREAMING_SNAKE_CASE`
/// - `#[tabula(rename = "...")]`: the column name of the field
/// - `#[tabula(alias = "...")]`: an alternate name for key-value tables, may
///   be repeated
/// - `#[tabula(skip)]`: the field is never populated
///
/// Names given by `#[serde(rename = "...")]` and `#[serde(alias = "...")]`
/// become alternate names too, unless disabled with
/// `Options::serde_aliases`.
///
/// The derived `CellValue` implementation lets the struct appear as a field
/// of another record, decoded from a key-value cell like `CfgId_1#Num_2`.
#[proc_macro_derive(Record, attributes(tabula, serde))]
pub fn derive(input: TokenStream) -> TokenStream {
    let dinput = parse_macro_input!(input as DeriveInput);
    expand(dinput)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(dinput: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_ident = &dinput.ident;

    let named_fields = match &dinput.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(x),
            ..
        }) => x,
        _ => {
            return Err(syn::Error::new_spanned(
                struct_ident,
                "Record can only be derived for structs with named fields",
            ))
        }
    };

    let rename_all = parse_rename_all(&dinput.attrs)?;

    let mut fields: Vec<RecordField> = Vec::new();
    for field in &named_fields.named {
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let base = ident.unraw().to_string();
        let column = match (&attrs.rename, rename_all) {
            (Some(rename), _) => rename.clone(),
            (None, Some(rule)) => rule.apply(&base),
            (None, None) => base,
        };

        if fields.iter().any(|x| x.column == column) {
            return Err(syn::Error::new_spanned(
                field,
                format!("more than one field is named `{}`", column),
            ));
        }

        fields.push(RecordField {
            field,
            column,
            attrs,
        });
    }

    let mut generics = dinput.generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(ref mut type_param) = *param {
            type_param.bounds.push(parse_quote!(::tabula::CellValue));
            type_param.bounds.push(parse_quote!(::std::default::Default));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let match_arms = fields.iter().map(|f| {
        let ident = &f.field.ident;
        let ty = &f.field.ty;
        let column = &f.column;
        quote! {
            #column => {
                if let ::std::option::Option::Some(__value) = ::tabula::populate::<#ty>(&*self, __cell) {
                    self.#ident = __value;
                }
                true
            }
        }
    });

    let aliases = fields.iter().flat_map(|f| {
        let column = &f.column;
        let attribute = f.attrs.aliases.iter().map(move |alias| {
            quote! {
                ::tabula::Alias {
                    name: #alias,
                    field: #column,
                    source: ::tabula::AliasSource::Attribute,
                }
            }
        });
        let serde = f
            .attrs
            .serde_aliases
            .iter()
            .filter(move |alias| *alias != column)
            .map(move |alias| {
                quote! {
                    ::tabula::Alias {
                        name: #alias,
                        field: #column,
                        source: ::tabula::AliasSource::Serde,
                    }
                }
            });
        attribute.chain(serde)
    });

    let output = quote! {
        impl #impl_generics ::tabula::Record for #struct_ident #ty_generics #where_clause {
            fn populate_field(&mut self, __name: &str, __cell: &::tabula::Cell<'_>) -> bool {
                match __name {
                    #(#match_arms)*
                    _ => false,
                }
            }

            fn aliases() -> &'static [::tabula::Alias] {
                const ALIASES: &[::tabula::Alias] = &[ #(#aliases),* ];
                ALIASES
            }
        }

        impl #impl_generics ::tabula::CellValue for #struct_ident #ty_generics #where_clause {
            const KIND: ::tabula::Kind = ::tabula::Kind::Record;

            fn decode(
                _owner: &dyn ::std::any::Any,
                cell: &::tabula::Cell<'_>,
            ) -> ::std::option::Option<Self> {
                ::tabula::decode_record::<Self>(cell)
            }
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_rules() {
        assert_eq!(RenameRule::PascalCase.apply("cfg_id"), "CfgId");
        assert_eq!(RenameRule::PascalCase.apply("name"), "Name");
        assert_eq!(RenameRule::CamelCase.apply("image_quality_level"), "imageQualityLevel");
        assert_eq!(RenameRule::SnakeCase.apply("cfg_id"), "cfg_id");
        assert_eq!(RenameRule::ScreamingSnakeCase.apply("cfg_id"), "CFG_ID");
    }

    #[test]
    fn test_field_attrs() {
        let field: syn::FieldsNamed = parse_quote!({
            #[tabula(alias = "a", alias = "b")]
            #[serde(default, rename(serialize = "x", deserialize = "y"), skip_serializing_if = "Option::is_none")]
            #[serde(alias = "z")]
            value: Option<i32>
        });
        let attrs = parse_field_attrs(&field.named[0].attrs).unwrap();
        assert_eq!(attrs.aliases, vec!["a", "b"]);
        assert_eq!(attrs.serde_aliases, vec!["y", "z"]);
        assert!(!attrs.skip);
    }

    #[test]
    fn test_unknown_attribute_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Model {
                #[tabula(flatten)]
                value: i32,
            }
        };
        assert!(expand(input).is_err());
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Model {
                #[tabula(rename = "b")]
                a: i32,
                b: i32,
            }
        };
        assert!(expand(input).is_err());
    }

    #[test]
    fn test_enum_rejected() {
        let input: DeriveInput = parse_quote! {
            enum Model { A, B }
        };
        let err = expand(input).unwrap_err();
        assert!(err.to_string().contains("named fields"));
    }
}
