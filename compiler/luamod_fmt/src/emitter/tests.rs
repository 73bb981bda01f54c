use super::{Emitter, StringEmitter};

#[test]
fn string_emitter_basic() {
    let mut emitter = StringEmitter::default();
    emitter.emit("hello");
    emitter.emit_space();
    emitter.emit("world");
    assert_eq!(emitter.output(), "hello world");
}

#[test]
fn string_emitter_indentation() {
    let mut emitter = StringEmitter::default();
    emitter.emit("do");
    emitter.emit_newline();
    emitter.emit_indent("  ", 2);
    emitter.emit("body");
    assert_eq!(emitter.output(), "do\n    body");
}

#[test]
fn finish_with_newline_trims_trailing_blank_lines() {
    let mut emitter = StringEmitter::default();
    emitter.emit("x\n\n\t \n");
    emitter.finish_with_newline();
    assert_eq!(emitter.output(), "x\n");
}

#[test]
fn finish_with_newline_on_empty_output() {
    let mut emitter = StringEmitter::with_capacity(8);
    emitter.finish_with_newline();
    assert_eq!(emitter.output(), "\n");
}
