//! grm::categories — canonical label enumerations.
//!
//! Purpose
//! -------
//! Maintain a fixed bijection between a set of distinct labels and the dense
//! integer codes `0..len` used by estimator arrays. A [`Categories`] value
//! is built once from the labels observed in an input column and never
//! re-derives its order afterwards, so every array and table produced from
//! the same converter agrees on which code means which label.
//!
//! Key behaviors
//! -------------
//! - [`LabelOrder::Lexical`] sorts distinct labels by their byte order
//!   (the ordering categorical dtypes use in data-frame libraries).
//! - [`LabelOrder::FirstSeen`] keeps labels in order of first appearance.
//! - Lookups in both directions are O(1): `code(label)` via a hash index,
//!   `label(code)` via the ordered label vector.
//!
//! Invariants
//! ----------
//! - `labels` contains no duplicates.
//! - `index[labels[i]] == i` for every `i < len()`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Ordering rule applied when a [`Categories`] is first derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOrder {
    /// Sort distinct labels lexicographically.
    #[default]
    Lexical,
    /// Keep labels in order of first appearance in the input.
    FirstSeen,
}

/// Categories — ordered set of labels with a label → code index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Categories {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl Categories {
    /// Derive an enumeration from a stream of (possibly repeated) labels.
    ///
    /// Parameters
    /// ----------
    /// - `labels`: every occurrence of a label in the source column; repeats
    ///   are collapsed.
    /// - `order`: how distinct labels are arranged into codes.
    ///
    /// Returns
    /// -------
    /// A [`Categories`] whose codes are `0..n_distinct`.
    pub fn from_labels<I, S>(labels: I, order: LabelOrder) -> Categories
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Categories::encode(labels, order).0
    }

    /// Derive an enumeration and code every input occurrence against it.
    ///
    /// Returns
    /// -------
    /// `(categories, codes)` where `codes[i]` is the code of the `i`-th
    /// input label, so `categories.label(codes[i])` yields that label back.
    ///
    /// Notes
    /// -----
    /// - Single pass over the input plus one sort of the distinct labels;
    ///   no per-row hash lookups after the enumeration is fixed.
    pub fn encode<I, S>(labels: I, order: LabelOrder) -> (Categories, Vec<usize>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut distinct: Vec<String> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut codes: Vec<usize> = Vec::new();
        for label in labels {
            let label = label.as_ref();
            let code = match seen.get(label) {
                Some(&code) => code,
                None => {
                    let code = distinct.len();
                    seen.insert(label.to_owned(), code);
                    distinct.push(label.to_owned());
                    code
                }
            };
            codes.push(code);
        }

        match order {
            LabelOrder::FirstSeen => (Categories { labels: distinct, index: seen }, codes),
            LabelOrder::Lexical => {
                let mut perm: Vec<usize> = (0..distinct.len()).collect();
                perm.sort_unstable_by(|&x, &y| distinct[x].cmp(&distinct[y]));

                // remap[first_seen_code] = lexical_code
                let mut remap = vec![0; distinct.len()];
                for (lexical, &first_seen) in perm.iter().enumerate() {
                    remap[first_seen] = lexical;
                }
                let labels =
                    perm.iter().map(|&first_seen| std::mem::take(&mut distinct[first_seen])).collect();
                let codes = codes.into_iter().map(|code| remap[code]).collect();
                (Categories::from_ordered(labels), codes)
            }
        }
    }

    // Caller guarantees `labels` is already distinct.
    fn from_ordered(labels: Vec<String>) -> Categories {
        let index = labels.iter().enumerate().map(|(code, label)| (label.clone(), code)).collect();
        Categories { labels, index }
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Code assigned to `label`, if the label is part of the enumeration.
    pub fn code(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Label carried by `code`, if `code < len()`.
    pub fn label(&self, code: usize) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    /// Labels in code order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}
