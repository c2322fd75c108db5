//! Sentence construction from parallel annotation arrays plus raw
//! dependency-edge descriptors of the shape
//! `LABEL(parentWord-parentIdx, childWord-childIdx)` (1-based indices,
//! parent index 0 meaning "no parent").
//!
//! Construction is a validation gate, not a parser of arbitrary text:
//! malformed input is a hard `Format` error and no partial sentence is
//! ever returned.

use regex::Regex;

use super::{Sentence, Token};
use crate::error::{FeatgenError, Result};

/// Label up to the first `(`, then two `word-index` references separated
/// by `", "`. Words may contain dashes; the index is the digit run before
/// the separator (parent) or the closing paren (child).
const DESCRIPTOR_PATTERN: &str = r"^(.+?)\((.+?)-(\d+), (.+)-(\d+)\)$";

/// One parsed `LABEL(parent-i, child-j)` descriptor, indices 0-based.
struct DepDescriptor {
    label: String,
    parent_word: String,
    parent: Option<usize>,
    child_word: String,
    child: usize,
}

fn parse_descriptor(re: &Regex, raw: &str) -> Result<DepDescriptor> {
    let caps = re.captures(raw.trim()).ok_or_else(|| {
        FeatgenError::Format(format!("malformed dependency descriptor: {:?}", raw))
    })?;
    let parent_ref: usize = caps[3]
        .parse()
        .map_err(|_| FeatgenError::Format(format!("bad parent index in {:?}", raw)))?;
    let child_ref: usize = caps[5]
        .parse()
        .map_err(|_| FeatgenError::Format(format!("bad child index in {:?}", raw)))?;
    if child_ref == 0 {
        return Err(FeatgenError::Format(format!(
            "child index must be 1-based in {:?}",
            raw
        )));
    }
    Ok(DepDescriptor {
        label: caps[1].to_string(),
        parent_word: caps[2].to_string(),
        parent: if parent_ref == 0 { None } else { Some(parent_ref - 1) },
        child_word: caps[4].to_string(),
        child: child_ref - 1,
    })
}

/// `[""]` (and an empty list) are the "no dependencies" markers.
fn no_dependencies(dependencies: &[String]) -> bool {
    dependencies.is_empty() || (dependencies.len() == 1 && dependencies[0].is_empty())
}

impl Sentence {
    /// Build a sentence from parallel annotation arrays and raw dependency
    /// descriptors.
    ///
    /// Every token starts with no parent and label `"ROOT"`; each
    /// descriptor overwrites its child token's parent and label. The word
    /// text encoded in a descriptor must match the token at the referenced
    /// index, all indices must be in range, and the resulting parent links
    /// must form a forest.
    pub fn from_arrays(
        begin_offsets: &[usize],
        end_offsets: &[usize],
        words: &[String],
        lemmas: &[String],
        poses: &[String],
        ners: &[String],
        dependencies: &[String],
    ) -> Result<Sentence> {
        let n = words.len();
        let lengths = [
            begin_offsets.len(),
            end_offsets.len(),
            lemmas.len(),
            poses.len(),
            ners.len(),
        ];
        if lengths.iter().any(|&l| l != n) {
            return Err(FeatgenError::Format(format!(
                "annotation arrays disagree on token count (words = {})",
                n
            )));
        }

        let mut parents: Vec<Option<usize>> = vec![None; n];
        let mut labels: Vec<String> = vec!["ROOT".to_string(); n];
        if !no_dependencies(dependencies) {
            let re = Regex::new(DESCRIPTOR_PATTERN).expect("invalid descriptor pattern");
            for raw in dependencies {
                let dep = parse_descriptor(&re, raw)?;
                if dep.child >= n {
                    return Err(FeatgenError::Format(format!(
                        "child index {} out of range in {:?}",
                        dep.child + 1,
                        raw
                    )));
                }
                if words[dep.child] != dep.child_word {
                    return Err(FeatgenError::Format(format!(
                        "descriptor {:?} names child {:?} but token {} is {:?}",
                        raw,
                        dep.child_word,
                        dep.child + 1,
                        words[dep.child]
                    )));
                }
                if let Some(parent) = dep.parent {
                    if parent >= n {
                        return Err(FeatgenError::Format(format!(
                            "parent index {} out of range in {:?}",
                            parent + 1,
                            raw
                        )));
                    }
                    if words[parent] != dep.parent_word {
                        return Err(FeatgenError::Format(format!(
                            "descriptor {:?} names parent {:?} but token {} is {:?}",
                            raw,
                            dep.parent_word,
                            parent + 1,
                            words[parent]
                        )));
                    }
                }
                parents[dep.child] = dep.parent;
                labels[dep.child] = dep.label;
            }
        }

        // Parent links must form a forest: from any token, following
        // parents must reach a root within n steps.
        for start in 0..n {
            let mut current = parents[start];
            let mut steps = 0;
            while let Some(next) = current {
                steps += 1;
                if steps >= n {
                    return Err(FeatgenError::Format(format!(
                        "dependency links contain a cycle through token {}",
                        start + 1
                    )));
                }
                current = parents[next];
            }
        }

        let tokens = (0..n)
            .map(|i| Token {
                word: words[i].clone(),
                lemma: lemmas[i].clone(),
                pos: poses[i].clone(),
                ner: ners[i].clone(),
                begin_char: begin_offsets[i],
                end_char: end_offsets[i],
                parent: parents[i],
                dep_label: std::mem::take(&mut labels[i]),
            })
            .collect();
        Ok(Sentence::from_tokens(tokens))
    }
}
