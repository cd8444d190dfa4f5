use crate::{mod_name::mod_name, new_mod::NewMod};
use proc_macro::TokenStream;
use proc_macro2::{Literal, Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{
    braced,
    parse::{Parse, ParseStream, Result},
    parse_macro_input, Attribute, Error, Ident, LitInt, Token, Type,
};

struct RegMap {
    block: NewMod,
    regs: Vec<Reg>,
}

struct Reg {
    attrs: Vec<Attribute>,
    ident: Ident,
    address: LitInt,
    size: LitInt,
    masks: Option<(LitInt, LitInt)>,
    fields: Vec<Field>,
}

struct Field {
    attrs: Vec<Attribute>,
    ident: Ident,
    offset: LitInt,
    width: LitInt,
    kind: Ident,
    behaviors: Vec<Ident>,
    ty: Option<Type>,
}

impl Parse for RegMap {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let block = input.parse()?;
        let mut regs = Vec::new();
        while !input.is_empty() {
            regs.push(input.parse()?);
        }
        Ok(Self { block, regs })
    }
}

impl Parse for Reg {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let ident = input.parse()?;
        let content;
        braced!(content in input);
        let address = content.parse()?;
        let size = content.parse()?;
        let masks = if content.peek(Token![;]) {
            None
        } else {
            Some((content.parse()?, content.parse()?))
        };
        content.parse::<Token![;]>()?;
        let mut fields = Vec::new();
        while !content.is_empty() {
            fields.push(content.parse()?);
        }
        Ok(Self { attrs, ident, address, size, masks, fields })
    }
}

impl Parse for Field {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let ident = input.parse()?;
        let content;
        braced!(content in input);
        let offset = content.parse()?;
        let width = content.parse()?;
        let kind = content.parse()?;
        let mut behaviors = Vec::new();
        while content.peek(Ident) {
            behaviors.push(content.parse()?);
        }
        let ty = if content.peek(Token![as]) {
            content.parse::<Token![as]>()?;
            Some(content.parse()?)
        } else {
            None
        };
        Ok(Self { attrs, ident, offset, width, kind, behaviors, ty })
    }
}

pub fn proc_macro(input: TokenStream) -> TokenStream {
    let RegMap { block, regs } = parse_macro_input!(input as RegMap);
    match expand(&block, &regs) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(block: &NewMod, regs: &[Reg]) -> Result<TokenStream2> {
    let NewMod { attrs, vis, ident } = block;
    let block_mod = Ident::new(&mod_name(&ident.to_string()), ident.span());
    let regs = regs.iter().map(gen_reg).collect::<Result<Vec<_>>>()?;
    Ok(quote! {
        #(#attrs)*
        #vis mod #block_mod {
            #(#regs)*
        }
    })
}

fn gen_reg(reg: &Reg) -> Result<TokenStream2> {
    let Reg { attrs, ident, address, size, masks, fields } = reg;
    let reg_mod = Ident::new(&mod_name(&ident.to_string()), ident.span());
    let bits = size.base10_parse::<u32>()?;
    let width = match bits {
        8 => format_ident!("U8"),
        16 => format_ident!("U16"),
        32 => format_ident!("U32"),
        64 => format_ident!("U64"),
        _ => return Err(Error::new(size.span(), "register size must be 0x08, 0x10, 0x20, or 0x40")),
    };
    let all_bits = u64::MAX >> (64 - bits);
    let (zero_mask, one_mask) = match masks {
        Some((zero, one)) => {
            let zero_mask = zero.base10_parse::<u64>()?;
            let one_mask = one.base10_parse::<u64>()?;
            if zero_mask & !all_bits != 0 {
                return Err(Error::new(zero.span(), "mask exceeds the register size"));
            }
            if one_mask & !all_bits != 0 {
                return Err(Error::new(one.span(), "mask exceeds the register size"));
            }
            if zero_mask & one_mask != 0 {
                return Err(Error::new(one.span(), "write-ignored masks intersect"));
            }
            (zero_mask, one_mask)
        }
        None => (0, 0),
    };
    let zero_mask = Literal::u64_suffixed(zero_mask);
    let one_mask = Literal::u64_suffixed(one_mask);
    let fields = fields.iter().map(|field| gen_field(field, bits)).collect::<Result<Vec<_>>>()?;
    Ok(quote! {
        #(#attrs)*
        pub mod #reg_mod {
            #[allow(unused_imports)]
            use super::super::*;

            /// Register address.
            pub const ADDRESS: ::drone_regops::reg::Address = unsafe {
                ::drone_regops::reg::Address::new(#address, ::drone_regops::reg::Width::#width)
            }
            .with_write_ignored_if_zero(#zero_mask)
            .with_write_ignored_if_one(#one_mask);

            #(#fields)*
        }
    })
}

fn gen_field(field: &Field, bits: u32) -> Result<TokenStream2> {
    let Field { attrs, ident, offset, width, kind, behaviors, ty } = field;
    let offset_bits = offset.base10_parse::<u32>()?;
    let width_bits = width.base10_parse::<u32>()?;
    if width_bits == 0 {
        return Err(Error::new(width.span(), "field width must be positive"));
    }
    if offset_bits.checked_add(width_bits).map_or(true, |end| end > bits) {
        return Err(Error::new(offset.span(), "field exceeds the register size"));
    }
    let mask = Literal::u64_suffixed((u64::MAX >> (64 - width_bits)) << offset_bits);
    let kind = match kind.to_string().as_str() {
        "ReadOnly" | "WriteOnly" | "ReadWrite" | "WriteOnce" | "ReadWriteOnce" => kind,
        _ => return Err(Error::new(kind.span(), "unknown access kind")),
    };
    let mut read = None;
    let mut write = None;
    for behavior in behaviors {
        let (slot, variant) = match behavior.to_string().as_str() {
            "OneToClear" | "OneToSet" | "OneToToggle" | "ZeroToClear" | "ZeroToSet"
            | "ZeroToToggle" => (&mut write, behavior.clone()),
            "WriteClear" => (&mut write, format_ident!("Clear", span = behavior.span())),
            "WriteSet" => (&mut write, format_ident!("Set", span = behavior.span())),
            "WriteModify" => (&mut write, format_ident!("Modify", span = behavior.span())),
            "ReadClear" => (&mut read, format_ident!("Clear", span = behavior.span())),
            "ReadSet" => (&mut read, format_ident!("Set", span = behavior.span())),
            "ReadModify" => (&mut read, format_ident!("Modify", span = behavior.span())),
            "ReadModifyExternal" => {
                (&mut read, format_ident!("ModifyExternal", span = behavior.span()))
            }
            _ => return Err(Error::new(behavior.span(), "unknown field behavior")),
        };
        if slot.replace(variant).is_some() {
            return Err(Error::new(behavior.span(), "conflicting field behaviors"));
        }
    }
    let read = read.unwrap_or_else(|| Ident::new("Normal", Span::call_site()));
    let write = write.unwrap_or_else(|| Ident::new("Normal", Span::call_site()));
    let ty = match ty {
        Some(ty) => quote!(#ty),
        None if width_bits == 1 => quote!(bool),
        None => {
            let ty = format_ident!("u{}", bits);
            quote!(#ty)
        }
    };
    Ok(quote! {
        #(#attrs)*
        pub const #ident: ::drone_regops::reg::Field<#ty> = ::drone_regops::reg::Field::new(
            ::drone_regops::reg::FieldLocation::new(
                ADDRESS,
                #mask,
                ::drone_regops::reg::Access::new(::drone_regops::reg::AccessKind::#kind)
                    .read(::drone_regops::reg::ReadAction::#read)
                    .write(::drone_regops::reg::ModifiedWrite::#write),
            ),
        );
    })
}
