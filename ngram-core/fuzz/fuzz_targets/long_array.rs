//! Fuzzer for [`SegmentedLongArray`].
//!
//! Every operation is mirrored on a plain `Vec<i64>`, and the two must
//! agree after each step. Tiny segment lengths keep the fuzzer crossing
//! segment boundaries constantly.

#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ngram_core::SegmentedLongArray;

type Idx = u8;
type Val = i64;

/// Marker for empty slots in search operations
const EMPTY: Val = Val::MIN;

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Get(Idx),
    Set(Idx, Val),
    SetAndGrow(Idx, Val),
    Add(Val),
    Fill(Val, Idx),
    Shift(Idx, Idx, Idx),
    Search(Val, Idx, Idx, Idx, bool),
    Trim,
}

#[derive(Debug, Arbitrary)]
struct Input {
    segment_len: u8,
    ops: Vec<Op>,
}

/// Reference probe: first slot with `key` or `EMPTY`, one wrap.
fn model_search(model: &[Val], key: Val, start: usize, end: usize, from: usize, first_empty: bool) -> i64 {
    for i in (from..end).chain(start..from) {
        if model[i] == key {
            return i as i64;
        }
        if model[i] == EMPTY {
            return if first_empty { i as i64 } else { -1 };
        }
    }
    -1
}

fuzz_target!(|input: Input| {
    let mut array = SegmentedLongArray::builder()
        .segment_len(usize::from(input.segment_len % 16) + 1)
        .build();
    let mut model: Vec<Val> = Vec::new();

    for op in input.ops {
        match op {
            Op::Get(i) => {
                assert_eq!(array.get(i.into()).ok(), model.get(usize::from(i)).copied());
            }
            Op::Set(i, v) => {
                let result = array.set(i.into(), v);
                match model.get_mut(usize::from(i)) {
                    Some(slot) => {
                        assert!(result.is_ok());
                        *slot = v;
                    }
                    None => assert!(result.is_err()),
                }
            }
            Op::SetAndGrow(i, v) => {
                let i = usize::from(i);
                array.set_and_grow_if_needed(i as u64, v);
                if model.len() <= i {
                    model.resize(i + 1, 0);
                }
                model[i] = v;
            }
            Op::Add(v) => {
                array.add(v);
                model.push(v);
            }
            Op::Fill(v, n) => {
                let n = usize::from(n);
                array.fill(v, n as u64);
                if model.len() < n {
                    model.resize(n, 0);
                }
                model[..n].fill(v);
            }
            Op::Shift(src, dest, length) => {
                let (src, dest) = (usize::from(src), usize::from(dest));
                if src >= model.len() {
                    continue;
                }
                let length = usize::from(length) % (model.len() - src + 1);
                array.shift(src as u64, dest as u64, length as u64);
                if length > 0 && src != dest {
                    if dest + length > model.len() {
                        model.resize(dest + length, 0);
                    }
                    if dest > src {
                        for i in (0..length).rev() {
                            model[dest + i] = model[src + i];
                        }
                    } else {
                        for i in 0..length {
                            model[dest + i] = model[src + i];
                        }
                    }
                }
            }
            Op::Search(key, a, b, from, first_empty) => {
                let len = model.len();
                let start = usize::from(a).min(len);
                let end = usize::from(b).min(len).max(start);
                let from = if (start..end).contains(&usize::from(from)) {
                    usize::from(from)
                } else {
                    start
                };
                let found = array.linear_search(
                    key,
                    start as u64,
                    end as u64,
                    from as u64,
                    EMPTY,
                    first_empty,
                );
                assert_eq!(found, model_search(&model, key, start, end, from, first_empty));
            }
            Op::Trim => {
                array.trim();
                assert_eq!(array.capacity(), model.len() as u64);
            }
        }
        assert_eq!(array.len(), model.len() as u64);
    }
    assert!(array.iter().eq(model.iter().copied()));
});
