//! Fuzz target for document edits.
//!
//! Drives a growable and a fixed document through arbitrary edit, undo and
//! redo sequences, then checks that undoing everything restores the input.

#![no_main]

use arbitrary::Arbitrary;
use hexedit_rust::HexDocument;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    InsertByte { offset: u16, byte: u8 },
    InsertBytes { offset: u16, bytes: Vec<u8> },
    Remove { offset: u16, len: u16 },
    ReplaceByte { offset: u16, byte: u8 },
    ReplaceRange { offset: u16, len: u16, bytes: Vec<u8> },
    Undo,
    Redo,
    Commit,
    ToggleOverwrite,
}

#[derive(Arbitrary, Debug)]
struct Input {
    initial: Vec<u8>,
    ops: Vec<Op>,
}

fn run(doc: &mut HexDocument<'_>, ops: &[Op]) {
    for op in ops.iter().take(256) {
        // Errors are expected for out-of-range offsets; only panics matter.
        let _ = match op {
            Op::InsertByte { offset, byte } => doc.insert_byte(usize::from(*offset), *byte),
            Op::InsertBytes { offset, bytes } => doc.insert_bytes(usize::from(*offset), bytes),
            Op::Remove { offset, len } => doc.remove_range(usize::from(*offset), usize::from(*len)),
            Op::ReplaceByte { offset, byte } => doc.replace_byte(usize::from(*offset), *byte),
            Op::ReplaceRange { offset, len, bytes } => {
                doc.replace_range(usize::from(*offset), usize::from(*len), bytes)
            }
            Op::Undo => doc.undo().map(|_| ()),
            Op::Redo => doc.redo().map(|_| ()),
            Op::Commit => {
                doc.commit();
                Ok(())
            }
            Op::ToggleOverwrite => {
                doc.set_overwrite_mode(!doc.overwrite_mode());
                Ok(())
            }
        };
        assert_eq!(doc.changes().len(), doc.len());
        let _ = doc.to_readable_string();
    }
    while doc.undo().unwrap_or(false) {}
}

fuzz_target!(|input: Input| {
    let mut dynamic = HexDocument::from_vec(input.initial.clone());
    run(&mut dynamic, &input.ops);
    assert_eq!(dynamic.as_bytes(), input.initial.as_slice());

    let mut memory = input.initial.clone();
    let mut fixed = HexDocument::from_slice(&mut memory);
    run(&mut fixed, &input.ops);
    assert_eq!(fixed.len(), input.initial.len());
    assert_eq!(fixed.as_bytes(), input.initial.as_slice());
});
