//! Sentinel-delimited lists.
//!
//! A region of the final stack can hold several variable-length lists, each preceded by one
//! sentinel:
//!
//! ```text
//! bottom .. [Sentinel, a0, a1, ..] [Sentinel, b0, ..] .. top
//! ```
//!
//! Lists are decoded from the top in a single pass. Two adjacent sentinels form an empty list.

use alloy_primitives::U256;

use crate::{ListError, StackItem};

/// Lists decoded from the top of a stack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodedLists {
    /// The words of each list, in push order.
    pub lists: Vec<Vec<U256>>,
    /// The number of items taken from the top of the stack, sentinels included.
    pub consumed: usize,
}

/// Decodes one list per entry of `widths` from the top of `stack`.
///
/// `widths` gives the record width of each list in push order, so the last width belongs to the
/// list nearest the top. A list whose length is not a multiple of its width is rejected. A width
/// of zero only accepts empty lists.
pub fn decode_lists(stack: &[StackItem], widths: &[usize]) -> Result<DecodedLists, ListError> {
    let mut lists = vec![Vec::new(); widths.len()];
    let mut end = stack.len();
    for (list, &width) in widths.iter().enumerate().rev() {
        let found = widths.len() - 1 - list;
        let start = stack[..end]
            .iter()
            .rposition(|item| item.is_sentinel())
            .ok_or(ListError::MissingSentinel { expected: widths.len(), found })?;
        let words: Vec<U256> =
            stack[start + 1..end].iter().filter_map(|item| item.value()).collect();
        let aligned = match width {
            0 => words.is_empty(),
            width => words.len() % width == 0,
        };
        if !aligned {
            return Err(ListError::MisalignedList { list, width, length: words.len() });
        }
        lists[list] = words;
        end = start;
    }
    Ok(DecodedLists { lists, consumed: stack.len() - end })
}

/// Like [`decode_lists`] over raw words, treating every word equal to `sentinel` as a delimiter.
pub fn decode_words(
    words: &[U256],
    sentinel: U256,
    widths: &[usize],
) -> Result<DecodedLists, ListError> {
    let stack: Vec<StackItem> = words
        .iter()
        .map(|&word| if word == sentinel { StackItem::Sentinel } else { StackItem::Value(word) })
        .collect();
    decode_lists(&stack, widths)
}

/// Encodes records as one sentinel-delimited list.
pub fn encode_list<R: AsRef<[U256]>>(records: &[R]) -> Vec<StackItem> {
    let mut items = vec![StackItem::Sentinel];
    items.extend(
        records.iter().flat_map(|record| record.as_ref().iter().copied().map(StackItem::Value)),
    );
    items
}

/// Splits a decoded list into fixed-width records.
pub fn records<const W: usize>(list: &[U256]) -> impl Iterator<Item = [U256; W]> + '_ {
    list.chunks_exact(W).map(|chunk| {
        let mut record = [U256::ZERO; W];
        record.copy_from_slice(chunk);
        record
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(values: &[u64]) -> Vec<U256> {
        values.iter().map(|&value| U256::from(value)).collect()
    }

    #[test]
    fn test_decode_in_push_order() {
        let mut stack = vec![StackItem::Value(U256::from(99))];
        stack.extend(encode_list(&[words(&[1, 2]), words(&[3, 4])]));
        stack.extend(encode_list::<Vec<U256>>(&[]));
        stack.extend(encode_list(&[words(&[5, 6, 7])]));

        let decoded = decode_lists(&stack, &[2, 2, 3]).unwrap();
        assert_eq!(decoded.lists, vec![words(&[1, 2, 3, 4]), vec![], words(&[5, 6, 7])]);
        assert_eq!(decoded.consumed, stack.len() - 1);
    }

    #[test]
    fn test_adjacent_sentinels_are_empty_lists() {
        let stack = vec![StackItem::Sentinel, StackItem::Sentinel];
        let decoded = decode_lists(&stack, &[5, 2]).unwrap();
        assert_eq!(decoded.lists, vec![Vec::<U256>::new(), vec![]]);
    }

    #[test]
    fn test_errors() {
        let stack = encode_list(&[words(&[1, 2, 3])]);
        assert_eq!(
            decode_lists(&stack, &[2]),
            Err(ListError::MisalignedList { list: 0, width: 2, length: 3 })
        );
        assert_eq!(
            decode_lists(&stack, &[3, 3]),
            Err(ListError::MissingSentinel { expected: 2, found: 1 })
        );
    }

    #[test]
    fn test_decode_words() {
        let sentinel = U256::MAX;
        let raw = [sentinel, U256::from(1), U256::from(2), sentinel];
        let decoded = decode_words(&raw, sentinel, &[2, 2]).unwrap();
        assert_eq!(decoded.lists, vec![words(&[1, 2]), vec![]]);
    }

    #[test]
    fn test_records() {
        let list = words(&[1, 2, 3, 4]);
        let records: Vec<[U256; 2]> = records::<2>(&list).collect();
        assert_eq!(records, vec![[U256::from(1), U256::from(2)], [U256::from(3), U256::from(4)]]);
    }
}
