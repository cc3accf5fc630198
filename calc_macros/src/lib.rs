use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{parse_macro_input, FnArg, ItemFn, PatType, Type};

fn arity_error_msg(fn_name: &str, expected: usize) -> String {
    let noun = if expected == 1 { "argument" } else { "arguments" };
    format!("{}() takes {} {} but {{}} were given", fn_name, expected, noun)
}

fn is_f64(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map_or(false, |segment| segment.ident == "f64"),
        _ => false,
    }
}

/// Turns `fn name(a: f64, b: f64) -> Result<f64, E>` into
/// `fn name(args: &[f64]) -> Result<f64, E>`, the shape taken by identifier
/// functions. The generated wrapper rejects calls with the wrong number of
/// arguments; `E` must implement `From<String>`.
#[proc_macro_attribute]
pub fn calc_fn(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let attrs = &input.attrs;
    let vis = &input.vis;
    let fn_name = &input.sig.ident;
    let fn_args = &input.sig.inputs;
    let fn_body = &input.block;
    let fn_output = &input.sig.output;

    let mut arg_extractions = Vec::new();

    for (i, arg) in fn_args.iter().enumerate() {
        let FnArg::Typed(PatType { pat, ty, .. }) = arg else {
            return syn::Error::new(arg.span(), "calc_fn cannot be applied to methods")
                .to_compile_error()
                .into();
        };

        let arg_name = match **pat {
            syn::Pat::Ident(ref ident) => &ident.ident,
            _ => {
                return syn::Error::new(pat.span(), "calc_fn arguments must be plain identifiers")
                    .to_compile_error()
                    .into()
            }
        };

        if !is_f64(ty) {
            return syn::Error::new(ty.span(), "calc_fn arguments must be f64")
                .to_compile_error()
                .into();
        }

        arg_extractions.push(quote! {
            let #arg_name: f64 = args[#i];
        });
    }

    let args_len = arg_extractions.len();
    let err_msg = arity_error_msg(&fn_name.to_string(), args_len);
    let expanded = quote! {
        #(#attrs)*
        #vis fn #fn_name(args: &[f64]) #fn_output {
            if args.len() != #args_len {
                return Err(format!(#err_msg, args.len()).into());
            }

            #(#arg_extractions)*

            #fn_body
        }
    };

    TokenStream::from(expanded)
}
