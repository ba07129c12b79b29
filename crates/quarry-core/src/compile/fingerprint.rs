use crate::{
    compile::plan::{PlanFingerprint, Step},
    value::Value,
};
use sha2::{Digest, Sha256};

const FINGERPRINT_VERSION: u8 = 0x01;

/// Hash a step stream into a stable plan fingerprint.
pub(super) fn fingerprint_steps(steps: &[Step]) -> PlanFingerprint {
    let mut hasher = Sha256::new();
    write_tag(&mut hasher, FINGERPRINT_VERSION);
    write_len_u32(&mut hasher, steps.len());
    for step in steps {
        hash_step(&mut hasher, step);
    }

    PlanFingerprint::new(hasher.finalize().into())
}

fn hash_step(hasher: &mut Sha256, step: &Step) {
    match step {
        Step::Literal(value) => {
            write_tag(hasher, 0x10);
            write_value(hasher, value);
        }
        Step::Property(path) => {
            write_tag(hasher, 0x11);
            write_str(hasher, path.as_str());
        }
        Step::Parameter(name) => {
            write_tag(hasher, 0x12);
            write_str(hasher, name.as_str());
        }
        Step::Call { function, argc } => {
            write_tag(hasher, 0x13);
            write_tag(hasher, function.tag());
            write_len_u32(hasher, *argc);
        }
        Step::Compare(op) => {
            write_tag(hasher, 0x14);
            write_tag(hasher, op.tag());
        }
        Step::Probe { index, text } => {
            write_tag(hasher, 0x15);
            write_str(hasher, index);
            write_str(hasher, text);
        }
        Step::Rank { index } => {
            write_tag(hasher, 0x16);
            write_str(hasher, index);
        }
        Step::ToBool => write_tag(hasher, 0x17),
        Step::Not => write_tag(hasher, 0x18),
        Step::JumpIfFalse { target } => {
            write_tag(hasher, 0x19);
            write_len_u32(hasher, *target);
        }
        Step::JumpIfTrue { target } => {
            write_tag(hasher, 0x1a);
            write_len_u32(hasher, *target);
        }
    }
}

fn write_value(hasher: &mut Sha256, value: &Value) {
    write_tag(hasher, value.tag());
    match value {
        Value::Null => {}
        Value::Bool(b) => write_tag(hasher, u8::from(*b)),
        Value::Int(v) => hasher.update(v.to_be_bytes()),
        Value::Uint(v) => hasher.update(v.to_be_bytes()),
        Value::Float(v) => hasher.update(v.to_bits().to_be_bytes()),
        Value::Text(s) => write_str(hasher, s),
        Value::List(items) => {
            write_len_u32(hasher, items.len());
            for item in items {
                write_value(hasher, item);
            }
        }
        Value::Map(entries) => {
            write_len_u32(hasher, entries.len());
            for (key, item) in entries {
                write_str(hasher, key);
                write_value(hasher, item);
            }
        }
    }
}

fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}

fn write_str(hasher: &mut Sha256, s: &str) {
    write_len_u32(hasher, s.len());
    hasher.update(s.as_bytes());
}

fn write_len_u32(hasher: &mut Sha256, len: usize) {
    let len = u32::try_from(len).unwrap_or(u32::MAX);
    hasher.update(len.to_be_bytes());
}
