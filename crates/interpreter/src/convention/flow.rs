use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{
    address_to_word, decode_lists, encode_list, word_to_address, ConventionError, StackItem,
};

/// An ERC-1155 transfer record: `[token, from, to, id, amount]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc1155Transfer {
    /// Token contract.
    pub token: Address,
    /// Sender.
    pub from: Address,
    /// Recipient.
    pub to: Address,
    /// Token id.
    pub id: U256,
    /// Amount.
    pub amount: U256,
}

/// An ERC-721 transfer record: `[token, from, to, id]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc721Transfer {
    /// Token contract.
    pub token: Address,
    /// Sender.
    pub from: Address,
    /// Recipient.
    pub to: Address,
    /// Token id.
    pub id: U256,
}

/// An ERC-20 transfer record: `[token, to, amount]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20Transfer {
    /// Token contract.
    pub token: Address,
    /// Recipient.
    pub to: Address,
    /// Amount.
    pub amount: U256,
}

/// A native transfer record: `[to, amount]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeTransfer {
    /// Recipient.
    pub to: Address,
    /// Amount.
    pub amount: U256,
}

/// A mint or burn record: `[account, amount]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAmount {
    /// Account minted to or burned from.
    pub account: Address,
    /// Amount.
    pub amount: U256,
}

/// A fixed-width record of a flow list.
trait Record: Sized {
    const WIDTH: usize;

    fn from_words(words: &[U256]) -> Self;

    fn to_words(&self) -> Vec<U256>;
}

impl Record for Erc1155Transfer {
    const WIDTH: usize = 5;

    fn from_words(words: &[U256]) -> Self {
        Self {
            token: word_to_address(words[0]),
            from: word_to_address(words[1]),
            to: word_to_address(words[2]),
            id: words[3],
            amount: words[4],
        }
    }

    fn to_words(&self) -> Vec<U256> {
        vec![
            address_to_word(self.token),
            address_to_word(self.from),
            address_to_word(self.to),
            self.id,
            self.amount,
        ]
    }
}

impl Record for Erc721Transfer {
    const WIDTH: usize = 4;

    fn from_words(words: &[U256]) -> Self {
        Self {
            token: word_to_address(words[0]),
            from: word_to_address(words[1]),
            to: word_to_address(words[2]),
            id: words[3],
        }
    }

    fn to_words(&self) -> Vec<U256> {
        vec![
            address_to_word(self.token),
            address_to_word(self.from),
            address_to_word(self.to),
            self.id,
        ]
    }
}

impl Record for Erc20Transfer {
    const WIDTH: usize = 3;

    fn from_words(words: &[U256]) -> Self {
        Self { token: word_to_address(words[0]), to: word_to_address(words[1]), amount: words[2] }
    }

    fn to_words(&self) -> Vec<U256> {
        vec![address_to_word(self.token), address_to_word(self.to), self.amount]
    }
}

impl Record for NativeTransfer {
    const WIDTH: usize = 2;

    fn from_words(words: &[U256]) -> Self {
        Self { to: word_to_address(words[0]), amount: words[1] }
    }

    fn to_words(&self) -> Vec<U256> {
        vec![address_to_word(self.to), self.amount]
    }
}

impl Record for AccountAmount {
    const WIDTH: usize = 2;

    fn from_words(words: &[U256]) -> Self {
        Self { account: word_to_address(words[0]), amount: words[1] }
    }

    fn to_words(&self) -> Vec<U256> {
        vec![address_to_word(self.account), self.amount]
    }
}

fn parse<R: Record>(list: &[U256]) -> Vec<R> {
    list.chunks_exact(R::WIDTH).map(R::from_words).collect()
}

fn encode<R: Record>(list: &[R]) -> Vec<StackItem> {
    encode_list(&list.iter().map(Record::to_words).collect::<Vec<_>>())
}

/// The movements requested by a flow expression.
///
/// The stack tail holds six sentinel-delimited lists, pushed in field order, so the burn list is
/// nearest the top.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTransfers {
    /// ERC-1155 transfers.
    pub erc1155: Vec<Erc1155Transfer>,
    /// ERC-721 transfers.
    pub erc721: Vec<Erc721Transfer>,
    /// ERC-20 transfers.
    pub erc20: Vec<Erc20Transfer>,
    /// Native transfers.
    pub native: Vec<NativeTransfer>,
    /// Mints.
    pub mints: Vec<AccountAmount>,
    /// Burns.
    pub burns: Vec<AccountAmount>,
}

impl FlowTransfers {
    /// Record widths of the six lists, in push order.
    pub const WIDTHS: [usize; 6] = [
        Erc1155Transfer::WIDTH,
        Erc721Transfer::WIDTH,
        Erc20Transfer::WIDTH,
        NativeTransfer::WIDTH,
        AccountAmount::WIDTH,
        AccountAmount::WIDTH,
    ];

    /// Decodes the six lists from the top of the stack.
    pub fn from_stack(stack: &[StackItem]) -> Result<Self, ConventionError> {
        let mut lists = decode_lists(stack, &Self::WIDTHS)?.lists.into_iter();
        let mut next = || lists.next().unwrap_or_default();
        Ok(Self {
            erc1155: parse(&next()),
            erc721: parse(&next()),
            erc20: parse(&next()),
            native: parse(&next()),
            mints: parse(&next()),
            burns: parse(&next()),
        })
    }

    /// Encodes the six lists as a flow expression would leave them on the stack.
    pub fn to_stack(&self) -> Vec<StackItem> {
        let mut stack = encode(&self.erc1155);
        stack.extend(encode(&self.erc721));
        stack.extend(encode(&self.erc20));
        stack.extend(encode(&self.native));
        stack.extend(encode(&self.mints));
        stack.extend(encode(&self.burns));
        stack
    }

    /// Whether the flow moves nothing.
    pub fn is_empty(&self) -> bool {
        self.erc1155.is_empty()
            && self.erc721.is_empty()
            && self.erc20.is_empty()
            && self.native.is_empty()
            && self.mints.is_empty()
            && self.burns.is_empty()
    }
}
