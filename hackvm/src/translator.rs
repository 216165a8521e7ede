//! Multi-module link-time resolution.
//!
//! Translates an entry `.vm` module, then keeps pulling in modules from a
//! search path for every function that is called but not yet defined,
//! until either everything resolves or no remaining search-path file can
//! help. A module that does not define a name it was searched for is
//! cached as "not provided by that module" keyed by `(module, name)`, not
//! by name alone — so the same name can still resolve from a different
//! search-path file afterward.

use crate::code_writer::CodeWriter;
use crate::error::{Error, Result};
use crate::parser::{Located, Parser, Statement};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct Translator<W: Write> {
    writer: CodeWriter<W>,
    functions: IndexMap<String, (String, u32)>,
    referenced: IndexMap<String, (String, u32)>,
    not_found: HashSet<(String, String)>,
    pending_gotos: IndexMap<String, u32>,
}

impl<W: Write> Translator<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: CodeWriter::new(out),
            functions: IndexMap::new(),
            referenced: IndexMap::new(),
            not_found: HashSet::new(),
            pending_gotos: IndexMap::new(),
        }
    }

    pub fn emit_bootstrap(&mut self) -> Result<()> {
        self.writer.program_bootstrap()
    }

    /// Translates one module's source text, recording any function it
    /// calls but does not itself define.
    ///
    /// # Errors
    /// Returns [`Error::UnresolvedGoto`] if the module's `goto`/`if-goto`
    /// statements reference a label that is never declared anywhere in the
    /// same module by the time its source is exhausted.
    pub fn translate_module(&mut self, module_stem: &str, source: &str) -> Result<()> {
        self.writer.set_filename(module_stem);
        self.pending_gotos.clear();
        let mut parser = Parser::new(source);
        while let Some(Located { statement, line }) = parser.next_statement()? {
            self.translate_statement(module_stem, &statement, line)?;
        }
        if let Some((label, &line)) = self.pending_gotos.iter().next() {
            return Err(Error::UnresolvedGoto { line, function: module_stem.to_string(), label: label.clone() });
        }
        Ok(())
    }

    fn translate_statement(&mut self, module: &str, statement: &Statement, line: u32) -> Result<()> {
        match statement {
            Statement::Arithmetic(op) => self.writer.write_arithmetic(*op),
            Statement::Push(seg, idx) => self.writer.write_push(*seg, *idx),
            Statement::Pop(seg, idx) => self.writer.write_pop(*seg, *idx),
            Statement::Label(name) => {
                let mangled = self.writer.mangle(name);
                if self.functions.contains_key(&mangled) {
                    return Err(Error::LabelFunctionCollision { line, label: mangled });
                }
                if self.writer.has_label(&mangled) {
                    return Err(Error::DuplicateLabel { line, label: mangled });
                }
                self.pending_gotos.shift_remove(&mangled);
                self.writer.write_label(name)
            }
            Statement::Goto(name) => {
                let mangled = self.writer.mangle(name);
                if !self.writer.has_label(&mangled) {
                    self.pending_gotos.entry(mangled).or_insert(line);
                }
                self.writer.write_goto(name)
            }
            Statement::IfGoto(name) => {
                let mangled = self.writer.mangle(name);
                if !self.writer.has_label(&mangled) {
                    self.pending_gotos.entry(mangled).or_insert(line);
                }
                self.writer.write_if_goto(name)
            }
            Statement::Function(name, nvars) => {
                if self.functions.contains_key(name) {
                    return Err(Error::DuplicateFunction { line, name: name.clone() });
                }
                self.functions.insert(name.clone(), (module.to_string(), line));
                self.referenced.shift_remove(name);
                self.writer.write_function(name, *nvars)
            }
            Statement::Call(name, nargs) => {
                let resolved = match name {
                    Some(name) => name.clone(),
                    None => self
                        .writer
                        .current_function()
                        .ok_or(Error::CommandOutsideFunction { command: "call" })?
                        .to_string(),
                };
                if !self.functions.contains_key(&resolved) {
                    self.referenced
                        .entry(resolved.clone())
                        .or_insert_with(|| (module.to_string(), line));
                }
                self.writer.write_call(&resolved, *nargs)
            }
            Statement::Return => self.writer.write_return(),
        }
    }

    #[must_use]
    pub fn referenced_names(&self) -> Vec<String> {
        self.referenced.keys().cloned().collect()
    }

    #[must_use]
    pub fn is_resolved(&self, name: &str) -> bool {
        !self.referenced.contains_key(name)
    }

    pub fn mark_not_found(&mut self, module_stem: &str, name: &str) {
        self.not_found.insert((module_stem.to_string(), name.to_string()));
    }

    #[must_use]
    pub fn already_known_absent(&self, module_stem: &str, name: &str) -> bool {
        self.not_found.contains(&(module_stem.to_string(), name.to_string()))
    }

    pub fn finish(mut self) -> Result<()> {
        if !self.referenced.is_empty() {
            return Err(Error::UnresolvedFunctions(self.referenced.keys().cloned().collect()));
        }
        self.writer.program_teardown()?;
        self.writer.flush()?;
        Ok(())
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("module")
        .to_string()
}

/// Translates `entry` plus, as needed, whichever `.vm` files under
/// `search_path` define the functions it (transitively) calls.
///
/// # Errors
/// Propagates lexing/parsing errors from any module, and returns
/// [`Error::UnresolvedFunctions`] if some called function is never found.
pub fn translate_program<W: Write>(entry: &Path, search_path: &[PathBuf], out: W) -> Result<()> {
    let mut translator = Translator::new(out);
    translator.emit_bootstrap()?;

    let entry_stem = stem_of(entry);
    let source = std::fs::read_to_string(entry)?;
    translator.translate_module(&entry_stem, &source)?;

    let mut translated: HashSet<String> = HashSet::new();
    translated.insert(entry_stem);

    loop {
        let pending = translator.referenced_names();
        if pending.is_empty() {
            break;
        }

        let mut candidate: Option<PathBuf> = None;
        'search: for dir in search_path {
            let Ok(entries) = std::fs::read_dir(dir) else { continue };
            for dir_entry in entries.flatten() {
                let path = dir_entry.path();
                if path.extension().and_then(|s| s.to_str()) != Some("vm") {
                    continue;
                }
                let module_stem = stem_of(&path);
                if translated.contains(&module_stem) {
                    continue;
                }
                let might_help = pending
                    .iter()
                    .any(|name| !translator.already_known_absent(&module_stem, name));
                if might_help {
                    candidate = Some(path);
                    break 'search;
                }
            }
        }

        let Some(path) = candidate else {
            log::warn!("no search-path module can resolve: {pending:?}");
            break;
        };

        let module_stem = stem_of(&path);
        log::debug!("translating {module_stem} to resolve {pending:?}");
        let src = std::fs::read_to_string(&path)?;
        translator.translate_module(&module_stem, &src)?;
        translated.insert(module_stem.clone());

        for name in &pending {
            if !translator.is_resolved(name) {
                translator.mark_not_found(&module_stem, name);
            }
        }
    }

    translator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_module_without_calls_finishes() {
        let mut out = Vec::new();
        {
            let mut translator = Translator::new(&mut out);
            translator.emit_bootstrap().unwrap();
            translator
                .translate_module("Main", "push constant 1\npop local 0\n")
                .unwrap();
            translator.finish().unwrap();
        }
        let asm = String::from_utf8(out).unwrap();
        assert!(asm.contains("(__CALL)"));
        assert!(asm.contains("(__RETURN)"));
        assert!(asm.contains("(__FUNCTION)"));
    }

    #[test]
    fn unresolved_call_is_reported() {
        let mut out = Vec::new();
        let mut translator = Translator::new(&mut out);
        translator.emit_bootstrap().unwrap();
        translator
            .translate_module("Main", "call Other.missing 0\n")
            .unwrap();
        let err = translator.finish().unwrap_err();
        assert!(matches!(err, Error::UnresolvedFunctions(_)));
    }

    #[test]
    fn bare_call_resolves_to_the_enclosing_function() {
        let mut out = Vec::new();
        let mut translator = Translator::new(&mut out);
        translator.emit_bootstrap().unwrap();
        translator
            .translate_module("Main", "function Main.fact 1\npush argument 0\ncall 1\nreturn\n")
            .unwrap();
        assert!(translator.is_resolved("Main.fact"));
        translator.finish().unwrap();
    }

    #[test]
    fn bare_call_outside_any_function_is_rejected() {
        let mut out = Vec::new();
        let mut translator = Translator::new(&mut out);
        translator.emit_bootstrap().unwrap();
        let err = translator.translate_module("Main", "call 0\n").unwrap_err();
        assert!(matches!(err, Error::CommandOutsideFunction { command: "call" }));
    }

    #[test]
    fn defining_a_function_clears_the_reference() {
        let mut out = Vec::new();
        let mut translator = Translator::new(&mut out);
        translator.emit_bootstrap().unwrap();
        translator
            .translate_module("Main", "call Main.helper 0\n")
            .unwrap();
        assert!(!translator.is_resolved("Main.helper"));
        translator
            .translate_module("Main", "function Main.helper 0\nreturn\n")
            .unwrap();
        assert!(translator.is_resolved("Main.helper"));
        translator.finish().unwrap();
    }

    #[test]
    fn goto_to_undeclared_label_is_rejected() {
        let mut out = Vec::new();
        let mut translator = Translator::new(&mut out);
        translator.emit_bootstrap().unwrap();
        let err = translator
            .translate_module("Main", "function Main.loop 0\ngoto NOWHERE\nreturn\n")
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedGoto { .. }));
    }

    #[test]
    fn backward_and_forward_goto_within_a_function_both_resolve() {
        let mut out = Vec::new();
        let mut translator = Translator::new(&mut out);
        translator.emit_bootstrap().unwrap();
        translator
            .translate_module(
                "Main",
                "function Main.loop 0\n\
                 label START\n\
                 goto START\n\
                 goto END\n\
                 label END\n\
                 return\n",
            )
            .unwrap();
        translator.finish().unwrap();
    }
}
