//! Record derive macro implementation

mod attrs;

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

struct TaggedField<'a> {
    ident: &'a syn::Ident,
    column: String,
    auto_generated: bool,
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record can only be derived for structs",
            ));
        }
    };

    let mut tagged = Vec::new();
    for field in fields {
        let Some(tag) = attrs::field_tag(field)? else {
            continue;
        };
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        tagged.push(TaggedField {
            ident,
            column: tag.column.unwrap_or_else(|| ident.unraw().to_string()),
            auto_generated: tag.auto_generated,
        });
    }

    let tags = tagged.iter().map(|f| {
        let column = &f.column;
        let auto = f.auto_generated;
        quote! { ::dbx::FieldTag::new(#column, #auto) }
    });

    let setters = tagged.iter().enumerate().map(|(index, f)| {
        let ident = f.ident;
        quote! {
            #index => {
                self.#ident = ::dbx::FromValue::from_value(value)?;
            }
        }
    });

    let getters = tagged.iter().enumerate().map(|(index, f)| {
        let ident = f.ident;
        quote! {
            #index => ::core::option::Option::Some(::dbx::ToValue::to_value(&self.#ident)),
        }
    });

    let type_name = name.to_string();

    Ok(quote! {
        impl #impl_generics ::dbx::Record for #name #ty_generics #where_clause {
            fn field_tags() -> &'static [::dbx::FieldTag] {
                const TAGS: &[::dbx::FieldTag] = &[#(#tags),*];
                TAGS
            }

            #[allow(unused_variables, unreachable_code)]
            fn set_field(&mut self, index: usize, value: ::dbx::Value) -> ::dbx::DbxResult<()> {
                match index {
                    #(#setters)*
                    _ => {
                        return ::core::result::Result::Err(::dbx::DbxError::InvalidDestination(
                            ::std::format!("{} has no tagged field #{}", #type_name, index),
                        ));
                    }
                }
                ::core::result::Result::Ok(())
            }

            fn field_value(&self, index: usize) -> ::core::option::Option<::dbx::Value> {
                match index {
                    #(#getters)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}
