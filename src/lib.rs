mod args;
mod campos;
mod decodificador;
mod error;
mod etiqueta;
mod leitor;
mod lote;
mod metadata;
mod regex;

pub use self::{
    args::*, campos::*, decodificador::*, error::*, etiqueta::*, leitor::*, lote::*, metadata::*,
    regex::*,
};
