//! Fixed keyword and module tables of the RedCode language
//!
//! These are closed sets: adding a statement or module to the language means
//! updating them here.

/// Statements, block closers and logical operators
pub const KEYWORDS: &[&str] = &[
    "vn", "vt", "ln", "lt", "si", "sino", "si!", "mientras", "mientras!", "contar", "contar!",
    "cada", "cada!", "funcion", "retornar", "funcion!", "importar", "entrada", "mostrar", "Y",
    "O", "NO",
];

/// Module functions and list methods offered by completion
pub const MODULE_ENTRIES: &[&str] = &[
    "web.leer",
    "archivos.crear",
    "archivos.escribir",
    "archivos.leer",
    "archivos.inspeccionar",
    "random.numero",
    "random.elegir",
    "sistema.esperar",
    "sistema.limpiar",
    "tiempo.hora",
    "tiempo.fecha",
    "tiempo.año",
    "agregar",
    "eliminar",
    "ordenar",
    "invertir",
];

/// Keywords that introduce a user-defined name
pub const DECLARATION_KEYWORDS: &[&str] = &["vn", "vt", "ln", "lt", "funcion"];

/// Keywords whose line opens an indented block
pub const BLOCK_KEYWORDS: &[&str] = &["si", "mientras", "funcion", "cada"];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Namespaces used in dotted module calls, in table order without duplicates
pub fn module_prefixes() -> Vec<&'static str> {
    let mut prefixes: Vec<&'static str> = Vec::new();
    for entry in MODULE_ENTRIES {
        if let Some((prefix, _)) = entry.split_once('.') {
            if !prefixes.contains(&prefix) {
                prefixes.push(prefix);
            }
        }
    }
    prefixes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_prefixes_are_derived_from_dotted_entries() {
        assert_eq!(
            module_prefixes(),
            vec!["web", "archivos", "random", "sistema", "tiempo"]
        );
    }

    #[test]
    fn block_closers_are_keywords() {
        assert!(is_keyword("si!"));
        assert!(is_keyword("cada!"));
        assert!(!is_keyword("sino!"));
    }

    #[test]
    fn declaration_keywords_are_keywords() {
        assert!(DECLARATION_KEYWORDS.iter().all(|k| is_keyword(k)));
    }
}
