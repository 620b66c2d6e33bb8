/// Huffman Codec
///
/// Nén tin nhắn chat bằng Huffman coding. Payload gửi qua WebSocket gồm
/// chuỗi bit đã mã hoá (`'0'`/`'1'`) kèm bảng mã để client tự giải mã,
/// nên cả hai đều phải serialize được sang JSON.
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

/// Bảng mã: ký tự -> chuỗi bit
pub type HuffmanCodes = BTreeMap<char, String>;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    #[error("Cannot build a Huffman tree from empty input")]
    EmptyInput,
    #[error("Invalid bit '{0}' in encoded text")]
    InvalidBit(char),
    #[error("Encoded text ends with an incomplete code: {0}")]
    TrailingBits(String),
    #[error("Code table maps several symbols to the same code")]
    AmbiguousCodes,
}

/// Node của cây Huffman
#[derive(Debug)]
pub enum Node {
    Leaf { symbol: char, freq: usize },
    Branch { freq: usize, left: Box<Node>, right: Box<Node> },
}

impl Node {
    pub fn freq(&self) -> usize {
        match self {
            Node::Leaf { freq, .. } | Node::Branch { freq, .. } => *freq,
        }
    }
}

/// Phần tử trong min-heap. `seq` là thứ tự tạo node, dùng để phá hoà
/// khi hai node có cùng tần suất -> cây luôn giống nhau với cùng input.
struct HeapEntry {
    freq: usize,
    seq: usize,
    node: Node,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl HeapEntry {
    fn new(seq: usize, node: Node) -> Self {
        Self { freq: node.freq(), seq, node }
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    // BinaryHeap là max-heap nên đảo ngược thứ tự
    fn cmp(&self, other: &Self) -> Ordering {
        other.freq.cmp(&self.freq).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Dữ liệu đã nén, gửi nguyên qua WebSocket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compressed {
    pub encoded: String,
    pub codes: HuffmanCodes,
}

impl Compressed {
    /// Tỉ lệ số bit sau nén so với UTF-8 gốc
    pub fn ratio(&self, original: &str) -> f64 {
        if original.is_empty() {
            return 0.0;
        }
        self.encoded.len() as f64 / (original.len() * 8) as f64
    }

    pub fn decode(&self) -> Result<String, CodecError> {
        decode_text(&self.encoded, &self.codes)
    }
}

/// Đếm tần suất từng ký tự (giữ thứ tự xuất hiện đầu tiên) rồi gộp dần
/// hai node nhỏ nhất cho tới khi còn một gốc.
pub fn build_tree(text: &str) -> Result<Node, CodecError> {
    let mut order: Vec<(char, usize)> = Vec::new();
    let mut index: HashMap<char, usize> = HashMap::new();

    for symbol in text.chars() {
        match index.get(&symbol) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(symbol, order.len());
                order.push((symbol, 1));
            }
        }
    }

    let mut heap: BinaryHeap<HeapEntry> = order
        .into_iter()
        .enumerate()
        .map(|(seq, (symbol, freq))| HeapEntry::new(seq, Node::Leaf { symbol, freq }))
        .collect();

    let mut seq = heap.len();

    while heap.len() > 1 {
        let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
            break;
        };
        let freq = left.freq + right.freq;
        heap.push(HeapEntry::new(
            seq,
            Node::Branch { freq, left: Box::new(left.node), right: Box::new(right.node) },
        ));
        seq += 1;
    }

    heap.pop().map(|entry| entry.node).ok_or(CodecError::EmptyInput)
}

/// Duyệt cây: cạnh trái thêm `0`, cạnh phải thêm `1`.
pub fn generate_codes(root: &Node) -> HuffmanCodes {
    let mut codes = HuffmanCodes::new();

    // Chỉ có một ký tự -> gốc là lá, vẫn cần ít nhất 1 bit
    if let Node::Leaf { symbol, .. } = root {
        codes.insert(*symbol, "0".to_string());
        return codes;
    }

    walk(root, String::new(), &mut codes);
    codes
}

fn walk(node: &Node, prefix: String, codes: &mut HuffmanCodes) {
    match node {
        Node::Leaf { symbol, .. } => {
            codes.insert(*symbol, prefix);
        }
        Node::Branch { left, right, .. } => {
            walk(left, format!("{prefix}0"), codes);
            walk(right, format!("{prefix}1"), codes);
        }
    }
}

pub fn encode_text(text: &str) -> Result<Compressed, CodecError> {
    let root = build_tree(text)?;
    let codes = generate_codes(&root);

    let mut encoded = String::with_capacity(text.len() * 4);
    for symbol in text.chars() {
        if let Some(code) = codes.get(&symbol) {
            encoded.push_str(code);
        }
    }

    Ok(Compressed { encoded, codes })
}

/// Giải mã bằng reverse lookup: gom bit vào buffer cho tới khi buffer
/// trùng một mã trong bảng.
pub fn decode_text(encoded: &str, codes: &HuffmanCodes) -> Result<String, CodecError> {
    let reverse: HashMap<&str, char> =
        codes.iter().map(|(symbol, code)| (code.as_str(), *symbol)).collect();
    if reverse.len() != codes.len() {
        return Err(CodecError::AmbiguousCodes);
    }

    let mut decoded = String::new();
    let mut buffer = String::new();

    for bit in encoded.chars() {
        if bit != '0' && bit != '1' {
            return Err(CodecError::InvalidBit(bit));
        }
        buffer.push(bit);
        if let Some(symbol) = reverse.get(buffer.as_str()) {
            decoded.push(*symbol);
            buffer.clear();
        }
    }

    if !buffer.is_empty() {
        return Err(CodecError::TrailingBits(buffer));
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_prefix_free(codes: &HuffmanCodes) -> bool {
        let all: Vec<&String> = codes.values().collect();
        all.iter().enumerate().all(|(i, a)| {
            all.iter().enumerate().all(|(j, b)| i == j || !b.starts_with(a.as_str()))
        })
    }

    #[test]
    fn test_encode_decode_chat_message() {
        let text = "hello from room1, hello again!";
        let compressed = encode_text(text).unwrap();
        assert_eq!(decode_text(&compressed.encoded, &compressed.codes).unwrap(), text);
        assert!(compressed.encoded.chars().all(|b| b == '0' || b == '1'));
    }

    #[test]
    fn test_unicode_message() {
        let text = "Xin chào 🇻🇳, ổn không?";
        let compressed = encode_text(text).unwrap();
        assert_eq!(compressed.decode().unwrap(), text);
    }

    #[test]
    fn test_empty_input_is_error() {
        assert_eq!(encode_text("").unwrap_err(), CodecError::EmptyInput);
        assert!(matches!(build_tree(""), Err(CodecError::EmptyInput)));
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let compressed = encode_text("aaaa").unwrap();
        assert_eq!(compressed.codes.get(&'a').map(String::as_str), Some("0"));
        assert_eq!(compressed.encoded, "0000");
        assert_eq!(compressed.decode().unwrap(), "aaaa");
    }

    #[test]
    fn test_frequent_symbols_get_shorter_codes() {
        let compressed = encode_text("aaaaaaaabbbc").unwrap();
        let a = compressed.codes[&'a'].len();
        let c = compressed.codes[&'c'].len();
        assert!(a < c);
        assert_eq!(compressed.encoded.len(), 8 + 3 * 2 + 2);
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let compressed = encode_text("the quick brown fox jumps over the lazy dog").unwrap();
        assert!(is_prefix_free(&compressed.codes));
    }

    #[test]
    fn test_tree_is_deterministic() {
        let a = encode_text("abcabcabd").unwrap();
        let b = encode_text("abcabcabd").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tree_root_frequency_is_text_length() {
        let root = build_tree("mississippi").unwrap();
        assert_eq!(root.freq(), 11);
    }

    #[test]
    fn test_compresses_repetitive_text() {
        let text = "aaaaaaaaaaaaaaaaaaaabbbbbcc";
        let compressed = encode_text(text).unwrap();
        assert!(compressed.ratio(text) < 0.25);
    }

    #[test]
    fn test_decode_rejects_invalid_bit() {
        let compressed = encode_text("abab").unwrap();
        let err = decode_text("01x0", &compressed.codes).unwrap_err();
        assert_eq!(err, CodecError::InvalidBit('x'));
    }

    #[test]
    fn test_decode_rejects_trailing_bits() {
        let mut codes = HuffmanCodes::new();
        codes.insert('a', "0".to_string());
        codes.insert('b', "10".to_string());
        codes.insert('c', "11".to_string());
        let err = decode_text("0101", &codes).unwrap_err();
        assert_eq!(err, CodecError::TrailingBits("1".to_string()));
    }

    #[test]
    fn test_decode_rejects_duplicate_codes() {
        let mut codes = HuffmanCodes::new();
        codes.insert('a', "0".to_string());
        codes.insert('b', "0".to_string());
        assert_eq!(decode_text("0", &codes).unwrap_err(), CodecError::AmbiguousCodes);
    }

    #[test]
    fn test_decode_empty_payload() {
        assert_eq!(decode_text("", &HuffmanCodes::new()).unwrap(), "");
    }

    #[test]
    fn test_compressed_json_shape() {
        let compressed = encode_text("ab").unwrap();
        let json = serde_json::to_value(&compressed).unwrap();
        assert_eq!(json["encoded"], "01");
        assert_eq!(json["codes"]["a"], "0");
        assert_eq!(json["codes"]["b"], "1");
    }
}
