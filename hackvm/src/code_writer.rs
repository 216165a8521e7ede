//! Translates VM statements into Hack assembly.
//!
//! Arithmetic, logic and segment access are emitted inline per call site
//! (the original Nand2Tetris approach). `call`/`function`/`return` instead
//! jump through three shared trampoline sections (`__CALL`, `__RETURN`,
//! `__FUNCTION`) emitted once per program by [`CodeWriter::program_teardown`],
//! so the per-call-site code stays a short constant-size preamble
//! regardless of how large the callee's frame-management code is.

use crate::error::Result;
use crate::parser::{ArithOp, Segment};
use std::collections::HashSet;
use std::io::Write;

pub struct CodeWriter<W: Write> {
    out: W,
    label_counter: usize,
    filename: String,
    current_function: Option<String>,
    declared_labels: HashSet<String>,
}

impl<W: Write> CodeWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            label_counter: 0,
            filename: String::new(),
            current_function: None,
            declared_labels: HashSet::new(),
        }
    }

    /// Sets the module name used to qualify `static` variables.
    pub fn set_filename(&mut self, stem: &str) {
        self.filename.clear();
        self.filename.push_str(stem);
    }

    fn fresh_label(&mut self, tag: &str) -> String {
        let n = self.label_counter;
        self.label_counter += 1;
        format!("{tag}${n}")
    }

    fn mangled(&self, name: &str) -> String {
        match &self.current_function {
            Some(f) => format!("{f}.{name}"),
            None => name.to_string(),
        }
    }

    pub fn write_arithmetic(&mut self, op: ArithOp) -> Result<()> {
        writeln!(self.out, "// {op:?}")?;
        match op {
            ArithOp::Add => self.binary_op("D+M"),
            ArithOp::Sub => self.binary_op("D-M"),
            ArithOp::And => self.binary_op("D&M"),
            ArithOp::Or => self.binary_op("D|M"),
            ArithOp::Neg => self.unary_op(true),
            ArithOp::Not => self.unary_op(false),
            ArithOp::Eq => self.comparison("JEQ"),
            ArithOp::Gt => self.comparison("JGT"),
            ArithOp::Lt => self.comparison("JLT"),
        }
    }

    fn binary_op(&mut self, op: &str) -> Result<()> {
        self.pop_to_d()?;
        writeln!(self.out, "@R13\nM=D")?;
        self.pop_to_d()?;
        writeln!(self.out, "@R13\nD={op}")?;
        self.push_d()
    }

    fn unary_op(&mut self, is_neg: bool) -> Result<()> {
        self.pop_to_d()?;
        if is_neg {
            writeln!(self.out, "D=-D")?;
        } else {
            writeln!(self.out, "D=!D")?;
        }
        self.push_d()
    }

    fn comparison(&mut self, jump: &str) -> Result<()> {
        let is_true = self.fresh_label("CMP_TRUE");
        let end = self.fresh_label("CMP_END");
        self.pop_to_d()?;
        writeln!(self.out, "@R13\nM=D")?;
        self.pop_to_d()?;
        write!(
            self.out,
            "@R13\n\
             D=D-M\n\
             @{is_true}\n\
             D;{jump}\n\
             @SP\n\
             A=M\n\
             M=0\n\
             @{end}\n\
             0;JMP\n\
             ({is_true})\n\
             @SP\n\
             A=M\n\
             M=-1\n\
             ({end})\n\
             @SP\n\
             M=M+1\n"
        )?;
        Ok(())
    }

    pub fn write_push(&mut self, segment: Segment, index: i32) -> Result<()> {
        writeln!(self.out, "// push {segment:?} {index}")?;
        match segment {
            Segment::Constant => {
                writeln!(self.out, "@{index}\nD=A")?;
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = segment_base(segment);
                writeln!(self.out, "@{base}\nD=M\n@{index}\nA=D+A\nD=M")?;
            }
            Segment::Temp => {
                writeln!(self.out, "@{}\nD=M", 3 + index)?;
            }
            Segment::Pointer => {
                writeln!(self.out, "@{}\nD=M", pointer_symbol(index))?;
            }
            Segment::Static => {
                writeln!(self.out, "@{}.{index}\nD=M", self.filename)?;
            }
        }
        self.push_d()
    }

    pub fn write_pop(&mut self, segment: Segment, index: i32) -> Result<()> {
        writeln!(self.out, "// pop {segment:?} {index}")?;
        match segment {
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = segment_base(segment);
                writeln!(self.out, "@{base}\nD=M\n@{index}\nD=D+A\n@R13\nM=D")?;
                self.pop_to_d()?;
                writeln!(self.out, "@R13\nA=M\nM=D")?;
            }
            Segment::Temp => {
                self.pop_to_d()?;
                writeln!(self.out, "@{}\nM=D", 3 + index)?;
            }
            Segment::Pointer => {
                self.pop_to_d()?;
                writeln!(self.out, "@{}\nM=D", pointer_symbol(index))?;
            }
            Segment::Static => {
                self.pop_to_d()?;
                writeln!(self.out, "@{}.{index}\nM=D", self.filename)?;
            }
            Segment::Constant => unreachable!("parser rejects pop into constant"),
        }
        Ok(())
    }

    fn push_d(&mut self) -> Result<()> {
        writeln!(self.out, "@SP\nA=M\nM=D\n@SP\nM=M+1")?;
        Ok(())
    }

    fn pop_to_d(&mut self) -> Result<()> {
        writeln!(self.out, "@SP\nM=M-1\nA=M\nD=M")?;
        Ok(())
    }

    /// Called when a `function` statement enters a new function body, so
    /// that subsequent labels mangle against the right name.
    pub fn enter_function(&mut self, name: &str) {
        self.current_function = Some(name.to_string());
    }

    /// The function a bare `call <int>` resolves against.
    #[must_use]
    pub fn current_function(&self) -> Option<&str> {
        self.current_function.as_deref()
    }

    pub fn write_function(&mut self, name: &str, nvars: u16) -> Result<()> {
        self.enter_function(name);
        let body = format!("{name}$body");
        write!(
            self.out,
            "({name})\n\
             @{nvars}\n\
             D=A\n\
             @R15\n\
             M=D\n\
             @{body}\n\
             D=A\n\
             @R14\n\
             M=D\n\
             @__FUNCTION\n\
             0;JMP\n\
             ({body})\n"
        )?;
        Ok(())
    }

    pub fn write_call(&mut self, name: &str, nargs: u16) -> Result<()> {
        let ret = self.fresh_label(&format!("{}$ret", sanitize(name)));
        write!(
            self.out,
            "@{name}\n\
             D=A\n\
             @R13\n\
             M=D\n\
             @{nargs}\n\
             D=A\n\
             @R14\n\
             M=D\n\
             @{ret}\n\
             D=A\n\
             @R15\n\
             M=D\n\
             @__CALL\n\
             0;JMP\n\
             ({ret})\n"
        )?;
        Ok(())
    }

    pub fn write_return(&mut self) -> Result<()> {
        writeln!(self.out, "@__RETURN\n0;JMP")?;
        Ok(())
    }

    pub fn write_label(&mut self, name: &str) -> Result<()> {
        let mangled = self.mangled(name);
        self.declared_labels.insert(mangled.clone());
        writeln!(self.out, "({mangled})")?;
        Ok(())
    }

    #[must_use]
    pub fn has_label(&self, mangled: &str) -> bool {
        self.declared_labels.contains(mangled)
    }

    #[must_use]
    pub fn mangle(&self, name: &str) -> String {
        self.mangled(name)
    }

    pub fn write_goto(&mut self, name: &str) -> Result<()> {
        let mangled = self.mangled(name);
        writeln!(self.out, "@{mangled}\n0;JMP")?;
        Ok(())
    }

    pub fn write_if_goto(&mut self, name: &str) -> Result<()> {
        let mangled = self.mangled(name);
        self.pop_to_d()?;
        writeln!(self.out, "@{mangled}\nD;JNE")?;
        Ok(())
    }

    /// Emits the program bootstrap: initializes `SP` to the stack base
    /// (256). Unlike the classic Nand2Tetris VM translator, this does not
    /// inject an implicit `call Sys.init 0` — the entry module's own
    /// top-level statements run directly after this, matching
    /// `original_source/hackvm`'s `program_setup`.
    pub fn program_bootstrap(&mut self) -> Result<()> {
        write!(
            self.out,
            "@256\n\
             D=A\n\
             @SP\n\
             M=D\n"
        )?;
        Ok(())
    }

    pub fn program_teardown(&mut self) -> Result<()> {
        write!(
            self.out,
            "(__CALL)\n\
             @R15\n\
             D=M\n\
             @SP\n\
             A=M\n\
             M=D\n\
             @SP\n\
             M=M+1\n\
             @LCL\n\
             D=M\n\
             @SP\n\
             A=M\n\
             M=D\n\
             @SP\n\
             M=M+1\n\
             @ARG\n\
             D=M\n\
             @SP\n\
             A=M\n\
             M=D\n\
             @SP\n\
             M=M+1\n\
             @THIS\n\
             D=M\n\
             @SP\n\
             A=M\n\
             M=D\n\
             @SP\n\
             M=M+1\n\
             @THAT\n\
             D=M\n\
             @SP\n\
             A=M\n\
             M=D\n\
             @SP\n\
             M=M+1\n\
             @SP\n\
             D=M\n\
             @R14\n\
             D=D-M\n\
             @5\n\
             D=D-A\n\
             @ARG\n\
             M=D\n\
             @SP\n\
             D=M\n\
             @LCL\n\
             M=D\n\
             @R13\n\
             A=M\n\
             0;JMP\n\
             (__RETURN)\n\
             @LCL\n\
             D=M\n\
             @R13\n\
             M=D\n\
             @5\n\
             A=D-A\n\
             D=M\n\
             @R14\n\
             M=D\n\
             @SP\n\
             M=M-1\n\
             A=M\n\
             D=M\n\
             @ARG\n\
             A=M\n\
             M=D\n\
             @ARG\n\
             D=M+1\n\
             @SP\n\
             M=D\n\
             @R13\n\
             D=M\n\
             @1\n\
             A=D-A\n\
             D=M\n\
             @THAT\n\
             M=D\n\
             @R13\n\
             D=M\n\
             @2\n\
             A=D-A\n\
             D=M\n\
             @THIS\n\
             M=D\n\
             @R13\n\
             D=M\n\
             @3\n\
             A=D-A\n\
             D=M\n\
             @ARG\n\
             M=D\n\
             @R13\n\
             D=M\n\
             @4\n\
             A=D-A\n\
             D=M\n\
             @LCL\n\
             M=D\n\
             @R14\n\
             A=M\n\
             0;JMP\n\
             (__FUNCTION)\n\
             @R15\n\
             D=M\n\
             @__FUNCTION_SKIP\n\
             D;JEQ\n\
             (__FUNCTION_LOOP)\n\
             @SP\n\
             A=M\n\
             M=0\n\
             @SP\n\
             M=M+1\n\
             @R15\n\
             MD=M-1\n\
             @__FUNCTION_LOOP\n\
             D;JGT\n\
             (__FUNCTION_SKIP)\n\
             @R14\n\
             A=M\n\
             0;JMP\n"
        )?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

fn segment_base(segment: Segment) -> &'static str {
    match segment {
        Segment::Local => "LCL",
        Segment::Argument => "ARG",
        Segment::This => "THIS",
        Segment::That => "THAT",
        _ => unreachable!("only called for the four pointer-based segments"),
    }
}

fn pointer_symbol(index: i32) -> &'static str {
    match index {
        0 => "THIS",
        1 => "THAT",
        _ => unreachable!("parser only ever sees pointer 0 or 1"),
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut CodeWriter<Vec<u8>>) -> Result<()>) -> String {
        let mut cw = CodeWriter::new(Vec::new());
        f(&mut cw).unwrap();
        String::from_utf8(cw.out).unwrap()
    }

    #[test]
    fn push_constant_emits_literal_load() {
        let asm = render(|cw| cw.write_push(Segment::Constant, 7));
        assert!(asm.contains("@7"));
        assert!(asm.contains("D=A"));
    }

    #[test]
    fn pointer_segment_maps_to_this_that() {
        let asm = render(|cw| cw.write_push(Segment::Pointer, 1));
        assert!(asm.contains("@THAT"));
    }

    #[test]
    fn labels_mangle_with_enclosing_function() {
        let mut cw = CodeWriter::new(Vec::new());
        cw.enter_function("Main.loop");
        cw.write_label("L1").unwrap();
        assert!(cw.has_label("Main.loop.L1"));
    }

    #[test]
    fn call_and_function_reference_shared_sections() {
        let call_asm = render(|cw| cw.write_call("Foo.bar", 2));
        assert!(call_asm.contains("@__CALL"));
        let fn_asm = render(|cw| cw.write_function("Foo.bar", 3));
        assert!(fn_asm.contains("@__FUNCTION"));
    }
}
