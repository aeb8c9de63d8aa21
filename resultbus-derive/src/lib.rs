extern crate proc_macro;

use proc_macro::{TokenStream, TokenTree};

fn get_type_name(input: TokenStream) -> String {
    let mut iter = input.into_iter();
    loop {
        match iter.next() {
            Some(TokenTree::Ident(ident)) => {
                let name = ident.to_string();
                if name == "struct" || name == "enum" {
                    if let Some(next) = iter.next() {
                        return next.to_string();
                    }
                    break;
                }
            },
            None => break,
            _ => (),
        }
    }
    panic!("no type name found");
}

#[proc_macro_derive(Event)]
pub fn derive_event(input: TokenStream) -> TokenStream {
    let type_name = get_type_name(input);

    format!("
#[allow(non_snake_case)]
mod {0}_Event_impls {{
    impl resultbus::event::Event for super::{0} {{ }}
}}", type_name).parse().unwrap()
}

#[proc_macro_derive(Parcelable)]
pub fn derive_parcelable(input: TokenStream) -> TokenStream {
    let type_name = get_type_name(input);

    format!("
#[allow(non_snake_case)]
mod {0}_Parcelable_impls {{
    #[typetag::serde(name = \"{0}\")]
    impl resultbus::bridge::Parcelable for super::{0} {{ }}
}}", type_name).parse().unwrap()
}
