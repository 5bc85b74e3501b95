//! Pure ordering operations on file lists

use std::collections::{HashMap, HashSet};

use crate::media::MediaFile;

/// Project `files` through `order`.
///
/// Files named in `order` come first, in that order; names without a file are
/// skipped. The remaining files follow in their original relative order. The
/// output is always a permutation of the input.
pub fn apply_sort_order(files: &[MediaFile], order: &[String]) -> Vec<MediaFile> {
    let by_name: HashMap<&str, usize> = files
        .iter()
        .enumerate()
        .map(|(i, f)| (f.name.as_str(), i))
        .collect();

    let mut taken = vec![false; files.len()];
    let mut sorted = Vec::with_capacity(files.len());

    for name in order {
        if let Some(&i) = by_name.get(name.as_str()) {
            if !taken[i] {
                taken[i] = true;
                sorted.push(files[i].clone());
            }
        }
    }

    for (i, file) in files.iter().enumerate() {
        if !taken[i] {
            sorted.push(file.clone());
        }
    }

    sorted
}

/// Turn a display list into a full order: the displayed names followed by
/// the stale names of `order` that no longer have a file.
pub fn materialize(display: &[String], order: &[String]) -> Vec<String> {
    let shown: HashSet<&str> = display.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let mut full = display.to_vec();

    for name in order {
        if !shown.contains(name.as_str()) && seen.insert(name.as_str()) {
            full.push(name.clone());
        }
    }

    full
}

/// Remove the item at `from` and reinsert it at `to`
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Exchange two positions
pub fn swap_items<T>(items: &mut [T], i: usize, j: usize) -> bool {
    if i == j || i >= items.len() || j >= items.len() {
        return false;
    }
    items.swap(i, j);
    true
}
