//! Environment-variable configuration, mirroring the source's
//! `Envint`/`Envstr`/`Envintarray`: an unset or unparseable variable
//! silently falls back to its documented default, logged at `warn` level
//! rather than treated as a hard error.

use crate::book::Book;
use crate::board::START_FEN;
use std::collections::HashMap;
use std::env;

const DEFAULT_WIDTHS: &[i32] = &[3, 2, 1];

/// Book construction parameters read from the process environment.
#[derive(Debug, Clone)]
pub struct BookConfig {
    pub name: String,
    pub variantkey: String,
    pub rootfen: String,
    pub modulus: i32,
    pub analysisdepth: i32,
    pub enginedepth: i32,
    pub numcycles: i32,
    pub batchsize: i32,
    pub minimaxafter: i32,
    pub cutoff: i32,
    pub widths: Vec<i32>,
}

impl BookConfig {
    /// Read every recognized variable, falling back to documented
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> BookConfig {
        BookConfig {
            name: envstr("BOOKNAME", "default"),
            variantkey: envstr("BOOKVARIANT", "atomic"),
            rootfen: envstr("ANALYSISROOT", START_FEN),
            modulus: envint("BOOKMOD", 10),
            analysisdepth: envint("ANALYSISDEPTH", 20),
            enginedepth: envint("ENGINEDEPTH", 20),
            numcycles: envint("NUMCYCLES", 10),
            batchsize: envint("BATCHSIZE", 10),
            minimaxafter: envint("MINIMAXAFTER", 10),
            cutoff: envint("CUTOFF", 500),
            widths: envintarray("WIDTHS", DEFAULT_WIDTHS),
        }
    }

    /// Build the `Book` this configuration describes, with an empty cache.
    #[must_use]
    pub fn into_book(self) -> Book {
        Book {
            name: self.name,
            variantkey: self.variantkey,
            rootfen: self.rootfen,
            modulus: self.modulus,
            analysisdepth: self.analysisdepth,
            enginedepth: self.enginedepth,
            numcycles: self.numcycles,
            batchsize: self.batchsize,
            minimaxafter: self.minimaxafter,
            cutoff: self.cutoff,
            widths: self.widths,
            poscache: HashMap::new(),
        }
    }
}

fn envstr(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(v) => v,
        Err(_) => default.to_string(),
    }
}

fn envint(key: &str, default: i32) -> i32 {
    match env::var(key) {
        Ok(v) => v.parse().unwrap_or_else(|_| {
            log::warn!("{key}={v:?} is not a valid integer, using default {default}");
            default
        }),
        Err(_) => default,
    }
}

/// Comma-separated list of integers, e.g. `WIDTHS=4,3,2`.
fn envintarray(key: &str, default: &[i32]) -> Vec<i32> {
    match env::var(key) {
        Ok(v) => {
            let parsed: Option<Vec<i32>> = v.split(',').map(|s| s.trim().parse().ok()).collect();
            parsed.unwrap_or_else(|| {
                log::warn!("{key}={v:?} is not a comma-separated integer list, using default");
                default.to_vec()
            })
        }
        Err(_) => default.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envint_falls_back_on_missing_key() {
        assert_eq!(envint("BOOKBUILDER_TEST_NONEXISTENT_KEY", 42), 42);
    }

    #[test]
    fn envintarray_parses_comma_separated_list() {
        env::set_var("BOOKBUILDER_TEST_WIDTHS", "4,3,2");
        assert_eq!(
            envintarray("BOOKBUILDER_TEST_WIDTHS", DEFAULT_WIDTHS),
            vec![4, 3, 2]
        );
        env::remove_var("BOOKBUILDER_TEST_WIDTHS");
    }

    #[test]
    fn envintarray_falls_back_on_malformed_list() {
        env::set_var("BOOKBUILDER_TEST_WIDTHS_BAD", "4,x,2");
        assert_eq!(
            envintarray("BOOKBUILDER_TEST_WIDTHS_BAD", DEFAULT_WIDTHS),
            DEFAULT_WIDTHS.to_vec()
        );
        env::remove_var("BOOKBUILDER_TEST_WIDTHS_BAD");
    }

    #[test]
    fn from_env_uses_documented_defaults_when_unset() {
        let cfg = BookConfig::from_env();
        assert_eq!(cfg.variantkey, "atomic");
        assert_eq!(cfg.widths, vec![3, 2, 1]);
    }
}
