//! Field-level `#[dbx(...)]` attribute parsing.
//!
//! Two spellings are accepted:
//!
//! - tag string: `#[dbx("uid,auto_increment")]`, the column first, then
//!   comma-separated qualifiers; only the first qualifier is inspected and it
//!   must be exactly `auto_increment` (surrounding spaces allowed), everything
//!   else is ignored
//! - key form: `#[dbx(column = "uid", auto_increment)]`; the column defaults
//!   to the field name, as it does for a bare `#[dbx]`

use syn::{Ident, LitStr, Result, Token};

const AUTO_INCREMENT: &str = "auto_increment";

/// Parsed tag of one field.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct FieldTagAttr {
    pub column: Option<String>,
    pub auto_generated: bool,
}

impl syn::parse::Parse for FieldTagAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        if input.peek(LitStr) {
            let lit: LitStr = input.parse()?;
            if !input.is_empty() {
                return Err(input.error("expected a single tag string"));
            }
            return parse_tag_string(&lit);
        }

        let mut attr = FieldTagAttr::default();
        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            if input.peek(Token![=]) {
                let _: Token![=] = input.parse()?;
                let value: LitStr = input.parse()?;
                if ident != "column" {
                    return Err(syn::Error::new_spanned(
                        ident,
                        "unknown dbx key, expected `column`",
                    ));
                }
                attr.column = Some(non_empty_column(&value, value.value())?);
            } else if ident == AUTO_INCREMENT {
                attr.auto_generated = true;
            } else {
                return Err(syn::Error::new_spanned(
                    ident,
                    "unknown dbx qualifier, expected `auto_increment`",
                ));
            }

            if input.is_empty() {
                break;
            }
            let _: Token![,] = input.parse()?;
        }
        Ok(attr)
    }
}

fn non_empty_column(span: &LitStr, column: String) -> Result<String> {
    if column.trim().is_empty() {
        return Err(syn::Error::new_spanned(span, "dbx column name must not be empty"));
    }
    Ok(column.trim().to_string())
}

/// `"col,qualifier,..."`
pub(super) fn parse_tag_string(lit: &LitStr) -> Result<FieldTagAttr> {
    let raw = lit.value();
    let mut parts = raw.split(',');
    let column = non_empty_column(lit, parts.next().unwrap_or_default().to_string())?;
    let auto_generated = parts.next().is_some_and(|q| q.trim() == AUTO_INCREMENT);
    Ok(FieldTagAttr {
        column: Some(column),
        auto_generated,
    })
}

/// The tag on `field`, or `None` when the field carries no `#[dbx]`.
pub(super) fn field_tag(field: &syn::Field) -> Result<Option<FieldTagAttr>> {
    let mut found: Option<FieldTagAttr> = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("dbx") {
            continue;
        }
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate #[dbx] attribute"));
        }
        let parsed = match &attr.meta {
            syn::Meta::Path(_) => FieldTagAttr::default(),
            syn::Meta::List(list) => syn::parse2::<FieldTagAttr>(list.tokens.clone())?,
            syn::Meta::NameValue(nv) => {
                return Err(syn::Error::new_spanned(
                    nv,
                    "use #[dbx(\"column\")] or #[dbx(column = \"column\")]",
                ));
            }
        };
        found = Some(parsed);
    }
    Ok(found)
}
