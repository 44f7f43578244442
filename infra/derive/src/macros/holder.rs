use proc_macro2::TokenStream;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type, Visibility};

enum Display {
    Default,
    None,
    Explicit(LitStr),
}

struct SubEntry {
    name: LitStr,
    record: Type,
}

enum TagPlan {
    Entry { name: LitStr, display: Display },
    Compound {
        name: LitStr,
        display: Display,
        companion: Option<Type>,
        record: Option<Type>,
        sub_entries: Vec<SubEntry>,
    },
    Property { category: LitStr, name: LitStr, comment: LitStr },
}

struct FieldPlan<'a> {
    ident: &'a Ident,
    ignored: bool,
    frozen: bool,
    tags: Vec<TagPlan>,
}

pub fn expand_derive(input: &DeriveInput) -> TokenStream {
    match plan_fields(input) {
        Ok(plans) => render(input, &plans),
        Err(err) => err.to_compile_error(),
    }
}

fn plan_fields(input: &DeriveInput) -> syn::Result<Vec<FieldPlan<'_>>> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, "Holder can only be derived for structs"));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Holder requires a struct with named fields",
        ));
    };

    let mut plans = Vec::new();
    for field in &fields.named {
        if !matches!(field.vis, Visibility::Public(_)) {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else { continue };

        let mut plan = FieldPlan { ident, ignored: false, frozen: false, tags: Vec::new() };
        for attr in &field.attrs {
            let path = attr.path();
            if path.is_ident("holder") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("ignore") {
                        plan.ignored = true;
                    } else if meta.path.is_ident("frozen") {
                        plan.frozen = true;
                    } else {
                        return Err(meta.error("expected `ignore` or `frozen`"));
                    }
                    Ok(())
                })?;
            } else if path.is_ident("entry") {
                plan.tags.push(parse_entry(attr)?);
            } else if path.is_ident("compound") {
                plan.tags.push(parse_compound(attr)?);
            } else if path.is_ident("property") {
                plan.tags.push(parse_property(attr, ident)?);
            }
        }
        plans.push(plan);
    }

    Ok(plans)
}

fn parse_entry(attr: &syn::Attribute) -> syn::Result<TagPlan> {
    let mut name = None;
    let mut display = DisplayParser::default();
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            name = Some(meta.value()?.parse::<LitStr>()?);
            Ok(())
        } else {
            display.parse(&meta)
        }
    })?;

    let name = name.ok_or_else(|| syn::Error::new_spanned(attr, "entry requires `name = \"...\"`"))?;
    Ok(TagPlan::Entry { name, display: display.finish(attr)? })
}

fn parse_compound(attr: &syn::Attribute) -> syn::Result<TagPlan> {
    let mut name = None;
    let mut companion = None;
    let mut record = None;
    let mut sub_entries = Vec::new();
    let mut display = DisplayParser::default();

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            name = Some(meta.value()?.parse::<LitStr>()?);
        } else if meta.path.is_ident("companion") {
            companion = Some(meta.value()?.parse::<Type>()?);
        } else if meta.path.is_ident("record") {
            record = Some(meta.value()?.parse::<Type>()?);
        } else if meta.path.is_ident("sub_entry") {
            sub_entries.push(parse_sub_entry(&meta)?);
        } else {
            display.parse(&meta)?;
        }
        Ok(())
    })?;

    let name =
        name.ok_or_else(|| syn::Error::new_spanned(attr, "compound requires `name = \"...\"`"))?;
    Ok(TagPlan::Compound { name, display: display.finish(attr)?, companion, record, sub_entries })
}

fn parse_sub_entry(meta: &ParseNestedMeta<'_>) -> syn::Result<SubEntry> {
    let mut name = None;
    let mut record = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("name") {
            name = Some(inner.value()?.parse::<LitStr>()?);
        } else if inner.path.is_ident("record") {
            record = Some(inner.value()?.parse::<Type>()?);
        } else {
            return Err(inner.error("expected `name` or `record`"));
        }
        Ok(())
    })?;

    match (name, record) {
        (Some(name), Some(record)) => Ok(SubEntry { name, record }),
        _ => Err(meta.error("sub_entry requires both `name` and `record`")),
    }
}

fn parse_property(attr: &syn::Attribute, ident: &Ident) -> syn::Result<TagPlan> {
    let mut category = None;
    let mut name = None;
    let mut comment = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("category") {
            category = Some(meta.value()?.parse::<LitStr>()?);
        } else if meta.path.is_ident("name") {
            name = Some(meta.value()?.parse::<LitStr>()?);
        } else if meta.path.is_ident("comment") {
            comment = Some(meta.value()?.parse::<LitStr>()?);
        } else {
            return Err(meta.error("expected `category`, `name` or `comment`"));
        }
        Ok(())
    })?;

    let category = category
        .ok_or_else(|| syn::Error::new_spanned(attr, "property requires `category = \"...\"`"))?;
    let name = name.unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    let comment = comment.unwrap_or_else(|| LitStr::new("", ident.span()));
    Ok(TagPlan::Property { category, name, comment })
}

#[derive(Default)]
struct DisplayParser {
    explicit: Option<LitStr>,
    none: bool,
}

impl DisplayParser {
    fn parse(&mut self, meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("display_name") {
            self.explicit = Some(meta.value()?.parse::<LitStr>()?);
            Ok(())
        } else if meta.path.is_ident("no_display_name") {
            self.none = true;
            Ok(())
        } else {
            Err(meta.error("unsupported tag argument"))
        }
    }

    fn finish(self, attr: &syn::Attribute) -> syn::Result<Display> {
        match (self.explicit, self.none) {
            (Some(_), true) => Err(syn::Error::new_spanned(
                attr,
                "`display_name` and `no_display_name` are mutually exclusive",
            )),
            (Some(explicit), false) => Ok(Display::Explicit(explicit)),
            (None, true) => Ok(Display::None),
            (None, false) => Ok(Display::Default),
        }
    }
}

fn render(input: &DeriveInput, plans: &[FieldPlan<'_>]) -> TokenStream {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = plans.iter().map(|plan| {
        let field = plan.ident;
        let name = field.to_string();
        let ignored = plan.ignored.then(|| {
            quote! { .with_flags(::decl_domain::holder::FieldFlags::IGNORED) }
        });
        let frozen = plan.frozen.then(|| {
            quote! { .with_flags(::decl_domain::holder::FieldFlags::FROZEN) }
        });
        let tags = plan.tags.iter().map(render_tag);

        quote! {
            ::decl_domain::holder::Field::new(#name, &mut self.#field)
                #ignored
                #frozen
                #( .with_tag(#tags) )*
        }
    });

    quote! {
        #[automatically_derived]
        impl #impl_generics ::decl_domain::holder::Holder for #ident #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::decl_domain::holder::Field<'_>> {
                ::std::vec![ #(#fields),* ]
            }
        }
    }
}

fn render_tag(tag: &TagPlan) -> TokenStream {
    match tag {
        TagPlan::Entry { name, display } => {
            let display = render_display(display);
            quote! {
                ::decl_domain::tags::EntryTag { name: #name, display_name: #display }
            }
        },
        TagPlan::Compound { name, display, companion, record, sub_entries } => {
            let display = render_display(display);
            let companion = render_descriptor(companion.as_ref());
            let record = render_descriptor(record.as_ref());
            let sub_entries = sub_entries.iter().map(|SubEntry { name, record }| {
                quote! {
                    ::decl_domain::tags::SubEntryTag {
                        name: #name,
                        record: ::decl_domain::descriptor::TypeDescriptor::of::<#record>(),
                    }
                }
            });
            quote! {
                ::decl_domain::tags::CompoundTag {
                    name: #name,
                    display_name: #display,
                    companion: #companion,
                    record: #record,
                    sub_entries: ::std::vec![ #(#sub_entries),* ],
                }
            }
        },
        TagPlan::Property { category, name, comment } => quote! {
            ::decl_domain::tags::PropertyTag { category: #category, name: #name, comment: #comment }
        },
    }
}

fn render_display(display: &Display) -> TokenStream {
    match display {
        Display::Default => quote! { ::decl_domain::tags::DisplayName::Default },
        Display::None => quote! { ::decl_domain::tags::DisplayName::None },
        Display::Explicit(name) => quote! { ::decl_domain::tags::DisplayName::Explicit(#name) },
    }
}

fn render_descriptor(ty: Option<&Type>) -> TokenStream {
    ty.map_or_else(
        || quote! { ::std::option::Option::None },
        |ty| quote! { ::std::option::Option::Some(::decl_domain::descriptor::TypeDescriptor::of::<#ty>()) },
    )
}
