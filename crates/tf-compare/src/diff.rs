//! Unified diffs of line-oriented text

const CONTEXT_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// A run of lines: `first[i1..i2]` against `second[j1..j2]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Opcode {
    tag: Tag,
    i1: usize,
    i2: usize,
    j1: usize,
    j2: usize,
}

/// Unified diff of two strings split on `\n`, labelled `first` and `second`
///
/// Returns an empty string when the texts are identical.
pub fn diff(first: &str, second: &str) -> String {
    unified_diff(first, second, "first", "second")
}

/// Unified diff with explicit file labels for the `---` / `+++` headers
pub fn unified_diff(first: &str, second: &str, first_label: &str, second_label: &str) -> String {
    let a: Vec<&str> = first.split('\n').collect();
    let b: Vec<&str> = second.split('\n').collect();

    let mut out: Vec<String> = Vec::new();
    for group in grouped_opcodes(&opcodes(&a, &b), CONTEXT_LINES) {
        if out.is_empty() {
            out.push(format!("--- {}", first_label));
            out.push(format!("+++ {}", second_label));
        }
        let (head, tail) = (group[0], group[group.len() - 1]);
        out.push(format!(
            "@@ -{} +{} @@",
            format_range(head.i1, tail.i2),
            format_range(head.j1, tail.j2)
        ));
        for op in &group {
            match op.tag {
                Tag::Equal => {
                    out.extend(a[op.i1..op.i2].iter().map(|line| format!(" {}", line)));
                }
                Tag::Replace | Tag::Delete | Tag::Insert => {
                    out.extend(a[op.i1..op.i2].iter().map(|line| format!("-{}", line)));
                    out.extend(b[op.j1..op.j2].iter().map(|line| format!("+{}", line)));
                }
            }
        }
    }
    out.join("\n")
}

fn format_range(start: usize, stop: usize) -> String {
    let length = stop - start;
    match length {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, length),
    }
}

/// Align two line sequences on a longest common subsequence
///
/// The common prefix and suffix are matched directly; the rest is aligned
/// by recursive halving, so memory stays linear in the input size.
fn opcodes(a: &[&str], b: &[&str]) -> Vec<Opcode> {
    let (n, m) = (a.len(), b.len());

    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mut matches: Vec<(usize, usize)> = (0..prefix).map(|k| (k, k)).collect();
    align(
        &a[prefix..n - suffix],
        prefix,
        &b[prefix..m - suffix],
        prefix,
        &mut matches,
    );
    matches.extend((0..suffix).map(|k| (n - suffix + k, m - suffix + k)));

    let mut codes: Vec<Opcode> = Vec::new();
    let (mut i, mut j) = (0, 0);
    let mut k = 0;
    while k < matches.len() {
        let (start_i, start_j) = matches[k];
        push_gap(&mut codes, i, start_i, j, start_j);

        let mut run = 1;
        while k + run < matches.len() && matches[k + run] == (start_i + run, start_j + run) {
            run += 1;
        }
        codes.push(Opcode {
            tag: Tag::Equal,
            i1: start_i,
            i2: start_i + run,
            j1: start_j,
            j2: start_j + run,
        });

        i = start_i + run;
        j = start_j + run;
        k += run;
    }
    push_gap(&mut codes, i, n, j, m);

    codes
}

/// Record the unmatched lines `a[i1..i2]` against `b[j1..j2]`, if any
fn push_gap(codes: &mut Vec<Opcode>, i1: usize, i2: usize, j1: usize, j2: usize) {
    let tag = match (i2 > i1, j2 > j1) {
        (true, true) => Tag::Replace,
        (true, false) => Tag::Delete,
        (false, true) => Tag::Insert,
        (false, false) => return,
    };
    codes.push(Opcode { tag, i1, i2, j1, j2 });
}

/// Append matched index pairs of an LCS of `a` and `b`, in order
fn align(a: &[&str], a_offset: usize, b: &[&str], b_offset: usize, out: &mut Vec<(usize, usize)>) {
    if a.is_empty() || b.is_empty() {
        return;
    }
    if a.len() == 1 {
        if let Some(j) = b.iter().position(|line| *line == a[0]) {
            out.push((a_offset, b_offset + j));
        }
        return;
    }

    let mid = a.len() / 2;
    let forward = lcs_row(&a[..mid], b);

    let a_tail: Vec<&str> = a[mid..].iter().rev().copied().collect();
    let b_rev: Vec<&str> = b.iter().rev().copied().collect();
    let mut backward = lcs_row(&a_tail, &b_rev);
    backward.reverse();

    // forward[j] + backward[j] is the LCS length through split point j
    let mut split = 0;
    for j in 1..=b.len() {
        if forward[j] + backward[j] > forward[split] + backward[split] {
            split = j;
        }
    }

    align(&a[..mid], a_offset, &b[..split], b_offset, out);
    align(&a[mid..], a_offset + mid, &b[split..], b_offset + split, out);
}

/// LCS lengths of `a` against every prefix `b[..j]`, using two rows
fn lcs_row(a: &[&str], b: &[&str]) -> Vec<usize> {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            cur[j + 1] = if x == y {
                prev[j] + 1
            } else {
                cur[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev
}

/// Split opcodes into hunks with `context` unchanged lines around changes
fn grouped_opcodes(codes: &[Opcode], context: usize) -> Vec<Vec<Opcode>> {
    let mut codes = codes.to_vec();
    if codes.is_empty() {
        return Vec::new();
    }

    if let Some(first) = codes.first_mut() {
        if first.tag == Tag::Equal {
            first.i1 = first.i1.max(first.i2.saturating_sub(context));
            first.j1 = first.j1.max(first.j2.saturating_sub(context));
        }
    }
    if let Some(last) = codes.last_mut() {
        if last.tag == Tag::Equal {
            last.i2 = last.i2.min(last.i1 + context);
            last.j2 = last.j2.min(last.j1 + context);
        }
    }

    let mut groups = Vec::new();
    let mut group: Vec<Opcode> = Vec::new();
    for mut op in codes {
        if op.tag == Tag::Equal && op.i2 - op.i1 > context * 2 {
            group.push(Opcode {
                i2: op.i2.min(op.i1 + context),
                j2: op.j2.min(op.j1 + context),
                ..op
            });
            groups.push(std::mem::take(&mut group));
            op.i1 = op.i1.max(op.i2.saturating_sub(context));
            op.j1 = op.j1.max(op.j2.saturating_sub(context));
        }
        group.push(op);
    }
    if !(group.is_empty() || (group.len() == 1 && group[0].tag == Tag::Equal)) {
        groups.push(group);
    }

    groups
        .into_iter()
        .filter(|g| g.iter().any(|op| op.tag != Tag::Equal))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_has_no_diff() {
        assert_eq!(diff("a\nb", "a\nb"), "");
    }

    #[test]
    fn test_single_line_change() {
        assert_eq!(
            diff("a\nb\nc", "a\nd\nc"),
            "--- first\n+++ second\n@@ -1,3 +1,3 @@\n a\n-b\n+d\n c"
        );
    }

    #[test]
    fn test_insertion_and_deletion() {
        assert_eq!(
            diff("a\nb", "a\nb\nc"),
            "--- first\n+++ second\n@@ -1,2 +1,3 @@\n a\n b\n+c"
        );
        assert_eq!(
            diff("x\na", "a"),
            "--- first\n+++ second\n@@ -1,2 +1 @@\n-x\n a"
        );
    }

    #[test]
    fn test_context_is_trimmed() {
        let first = "1\n2\n3\n4\n5\n6\n7\n8";
        let second = "1\n2\n3\n4\n5\n6\n7\nX";
        assert_eq!(
            unified_diff(first, second, "expected", "actual"),
            "--- expected\n+++ actual\n@@ -5,4 +5,4 @@\n 5\n 6\n 7\n-8\n+X"
        );
    }

    #[test]
    fn test_separate_hunks() {
        let first = "a\n1\n2\n3\n4\n5\n6\n7\nb";
        let second = "A\n1\n2\n3\n4\n5\n6\n7\nB";
        assert_eq!(
            diff(first, second),
            "--- first\n+++ second\n\
             @@ -1,4 +1,4 @@\n-a\n+A\n 1\n 2\n 3\n\
             @@ -6,4 +6,4 @@\n 5\n 6\n 7\n-b\n+B"
        );
    }

    #[test]
    fn test_large_input_single_change() {
        let first: Vec<String> = (0..20_000).map(|i| format!("line {}", i)).collect();
        let mut second = first.clone();
        second[10_000] = "changed".to_string();

        let out = diff(&first.join("\n"), &second.join("\n"));
        assert_eq!(
            out,
            "--- first\n+++ second\n@@ -9998,7 +9998,7 @@\n \
             line 9997\n line 9998\n line 9999\n-line 10000\n+changed\n \
             line 10001\n line 10002\n line 10003"
        );
    }

    #[test]
    fn test_interleaved_changes_align_on_common_lines() {
        assert_eq!(
            diff("a\nx\nb\ny\nc", "a\nb\nz\nc"),
            "--- first\n+++ second\n@@ -1,5 +1,4 @@\n a\n-x\n b\n-y\n+z\n c"
        );
    }

    #[test]
    fn test_empty_range() {
        assert_eq!(format_range(0, 0), "0,0");
        assert_eq!(format_range(2, 3), "3");
        assert_eq!(format_range(2, 5), "3,3");
    }
}
