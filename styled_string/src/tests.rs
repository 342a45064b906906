// Copyright 2025 the StyledStrings Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use regex::Regex;
use style_rules::{Expansion, Rule, StyleSheet, TagMarkup};

use crate::{Error, Segment, StyledString};

fn plain(text: &str) -> StyledString {
    StyledString::from(text)
}

fn styled(text: &str, style: &str) -> StyledString {
    StyledString::styled(text, style)
}

/// Checks the structural invariants of a normalized tree: no empty
/// children, no adjacent mergeable children, and no style-less wrapper
/// around a single styled child.
fn assert_invariants(node: &StyledString) {
    if node.style().is_none() {
        if let [Segment::Styled(_)] = node.children() {
            panic!("style-less wrapper around a single styled child survived");
        }
    }
    let mut previous: Option<&Segment> = None;
    for child in node.children() {
        assert!(!child.is_empty(), "empty child survived normalization");
        match (previous, child) {
            (Some(Segment::Text(_)), Segment::Text(_)) => {
                panic!("adjacent text runs survived normalization");
            }
            (Some(Segment::Styled(a)), Segment::Styled(b)) => {
                assert_ne!(a.style(), b.style(), "adjacent equal styles survived");
            }
            _ => {}
        }
        if let Segment::Styled(nested) = child {
            assert_invariants(nested);
        }
        previous = Some(child);
    }
}

#[test]
fn plain_text_round_trips() {
    let s = plain("hello");
    assert_eq!(s.plain(), "hello");
    assert_eq!(s.style(), None);
    assert_eq!(s.len(), 5);
    assert!(!s.is_empty());
    assert!(plain("").is_empty());
}

#[test]
fn styled_absorbs_an_unstyled_argument() {
    let s = styled("hello", "bold");
    assert_eq!(s.style(), Some("bold"));
    assert_eq!(s.children(), &[Segment::Text("hello".to_owned())]);
}

#[test]
fn styled_nests_a_styled_argument() {
    let inner = styled("hello", "inner");
    let outer = StyledString::styled(inner.clone(), "outer");
    assert_eq!(outer.style(), Some("outer"));
    assert_eq!(outer.children(), &[Segment::Styled(inner)]);
    assert_eq!(
        outer.flatten(),
        vec![("hello".to_owned(), "outer.inner".to_owned())]
    );
}

#[test]
fn display_and_string_equality_use_plain_text() {
    let s = plain("hi") + styled("!", "x");
    assert_eq!(s.to_string(), "hi!");
    assert_eq!(s, "hi!");
    assert_eq!("hi!", s);
    // A root style makes plain-string comparison false, whatever the text.
    assert_ne!(styled("hi!", "x"), "hi!");
}

#[test]
fn normalize_merges_adjacent_text_runs() {
    let mut s = plain("ab");
    s += "cd";
    s += "ef";
    assert!(!s.is_normalized());
    s.normalize();
    assert_eq!(s.children(), &[Segment::Text("abcdef".to_owned())]);
}

#[test]
fn normalize_merges_adjacent_equal_styles() {
    let mut s = plain("x");
    s += styled("a", "b");
    s += styled("c", "b");
    s.normalize();
    assert_eq!(s.flatten().len(), 2);
    let [Segment::Text(_), Segment::Styled(merged)] = s.children() else {
        panic!("expected a text child and one merged styled child");
    };
    assert_eq!(merged.style(), Some("b"));
    assert_eq!(merged.plain(), "ac");
}

#[test]
fn normalize_drops_empty_children() {
    let mut s = styled("", "b") + "x";
    s.normalize();
    assert_eq!(s, plain("x"));
    assert_eq!(s.children(), &[Segment::Text("x".to_owned())]);
}

#[test]
fn normalize_hoists_a_single_styled_child() {
    let mut s = StyledString::new() + styled("a", "b");
    s.normalize();
    assert_eq!(s.style(), Some("b"));
    assert_eq!(s.children(), &[Segment::Text("a".to_owned())]);
}

#[test]
fn equality_ignores_tree_shape() {
    let split = plain("a") + styled("b", "x") + styled("c", "x");
    let merged = plain("a") + styled("bc", "x");
    assert_eq!(split, merged);
    assert_ne!(split, plain("a") + styled("bc", "y"));
}

#[test]
fn concat_splices_equal_root_styles() {
    let joined = styled("ab", "b") + styled("cd", "b");
    assert_eq!(joined.style(), Some("b"));
    assert_eq!(joined, styled("abcd", "b"));
}

#[test]
fn concat_nests_differing_root_styles() {
    let joined = styled("ab", "x") + styled("cd", "y");
    assert_eq!(joined.style(), None);
    assert_eq!(
        joined.flatten(),
        vec![
            ("ab".to_owned(), "x".to_owned()),
            ("cd".to_owned(), "y".to_owned()),
        ]
    );
}

#[test]
fn concatenation_concatenates_the_plain_projections() {
    let a = styled("one", "x");
    let b = plain(" two");
    let c = styled(" three", "y");
    let joined = a.clone() + b.clone() + c.clone();
    assert_eq!(joined.plain(), a.plain() + &b.plain() + &c.plain());
}

#[test]
fn append_does_not_alias_the_argument() {
    let piece = styled("x", "s");
    let mut grown = plain("a");
    grown += piece.clone();
    grown += "more";
    grown.normalize();
    assert_eq!(piece, styled("x", "s"));
    assert_eq!(grown.plain(), "axmore");
}

#[test]
fn prepending_plain_text_works() {
    let s = "pre " + styled("post", "x");
    assert_eq!(s.plain(), "pre post");
    assert_eq!(
        s.flatten(),
        vec![
            ("pre ".to_owned(), String::new()),
            ("post".to_owned(), "x".to_owned()),
        ]
    );
}

#[test]
fn repeat_preserves_the_root_style() {
    let s = styled("ab", "x");
    assert_eq!(s.repeat(3), styled("ababab", "x"));

    let empty = s.repeat(0);
    assert!(empty.is_empty());
    assert_eq!(empty.style(), Some("x"));
}

#[test]
fn repeat_of_mixed_children_repeats_spans() {
    let s = plain("a") + styled("b", "s");
    let repeated = s.repeat(2);
    assert_eq!(repeated.plain(), "abab");
    assert_eq!(repeated.flatten().len(), 4);
}

#[test]
fn slicing_preserves_spans() {
    let s = styled("abc", "x") + styled("def", "y");
    let middle = s.slice(2..4).unwrap();
    assert_eq!(middle.plain(), "cd");
    assert_eq!(
        middle.flatten(),
        vec![
            ("c".to_owned(), "x".to_owned()),
            ("d".to_owned(), "y".to_owned()),
        ]
    );
}

#[test]
fn slicing_clamps_and_keeps_the_root_style() {
    let s = styled("abc", "x");
    assert_eq!(s.slice(..).unwrap(), s);
    assert_eq!(s.slice(1..100).unwrap(), styled("bc", "x"));
    let reversed = s.slice(2..1).unwrap();
    assert!(reversed.is_empty());
    assert_eq!(reversed.style(), Some("x"));
}

#[test]
fn slicing_rejects_mid_character_offsets() {
    let s = plain("caf\u{e9}!");
    assert_eq!(
        s.slice(0..4).unwrap_err(),
        Error::NotOnCharBoundary { index: 4 }
    );
    assert_eq!(s.slice(0..3).unwrap().plain(), "caf");
    assert_eq!(s.slice(0..5).unwrap().plain(), "caf\u{e9}");
}

#[test]
fn char_at_returns_one_styled_character() {
    let s = styled("caf\u{e9}", "x") + plain("!");
    assert_eq!(s.char_at(3).unwrap(), styled("\u{e9}", "x"));
    assert_eq!(s.char_at(5).unwrap(), plain("!"));
    assert_eq!(
        s.char_at(4).unwrap_err(),
        Error::NotOnCharBoundary { index: 4 }
    );
    assert_eq!(
        s.char_at(6).unwrap_err(),
        Error::IndexOutOfRange { index: 6, len: 6 }
    );
}

#[test]
fn stepped_slicing_is_rejected() {
    let s = plain("abcdef");
    assert_eq!(
        s.slice_with_step(0..4, 2).unwrap_err(),
        Error::UnsupportedSliceStep { step: 2 }
    );
    assert_eq!(s.slice_with_step(0..4, 1).unwrap().plain(), "abcd");
}

#[test]
fn slices_recombine_to_the_original() {
    let s = plain("one ") + styled("two", "x") + styled(" three", "y");
    for k in 0..=s.len() {
        let recombined = s.slice(..k).unwrap() + s.slice(k..).unwrap();
        assert_eq!(recombined, s, "split at {k}");
    }
}

#[test]
fn search_works_on_the_plain_projection() {
    let s = styled("hello", "a") + plain(" world");
    assert_eq!(s.find("lo w"), Some(3));
    assert_eq!(s.rfind("l"), Some(9));
    assert_eq!(s.find("xyz"), None);
    assert_eq!(s.index_of("world").unwrap(), 6);
    assert_eq!(s.index_of("xyz").unwrap_err(), Error::SubstringNotFound);
    assert!(s.contains("o w"));
    assert_eq!(s.count_matches("l"), 3);
    assert_eq!(s.count_matches(""), s.char_count() + 1);
}

#[test]
fn startswith_ignores_styles_unless_asked() {
    let s = styled("error", "severity") + plain(": oops");
    assert!(s.starts_with("err"));
    assert!(s.ends_with("oops"));
    assert!(s.starts_with_styled(&styled("err", "severity")));
    assert!(!s.starts_with_styled(&plain("err")));
    assert!(s.ends_with_styled(&plain(" oops")));
    assert!(!s.ends_with_styled(&styled(" oops", "severity")));
}

#[test]
fn partition_keeps_spans_on_both_sides() {
    let s = styled("error", "severity") + plain(": disk on fire");
    let (head, sep, tail) = s.partition(":");
    assert_eq!(head, styled("error", "severity"));
    assert_eq!(sep, plain(":"));
    assert_eq!(tail, plain(" disk on fire"));

    let (head, sep, tail) = s.partition("@");
    assert_eq!(head, s);
    assert!(sep.is_empty() && tail.is_empty());

    let (head, _, tail) = s.rpartition("i");
    assert_eq!(head.plain(), "error: disk on f");
    assert_eq!(tail.plain(), "re");
}

#[test]
fn whitespace_split_drops_empty_pieces() {
    let s = plain("  one ") + styled("two  three", "x") + plain(" ");
    let words = s.split(None, None);
    assert_eq!(words.len(), 3);
    assert_eq!(words[0], plain("one"));
    assert_eq!(words[1], styled("two", "x"));
    assert_eq!(words[2], styled("three", "x"));
    assert!(plain("   ").split(None, None).is_empty());
}

#[test]
fn separator_split_keeps_empty_pieces() {
    let s = plain("a,,b");
    let pieces = s.split(Some(","), None);
    assert_eq!(pieces.len(), 3);
    assert!(pieces[1].is_empty());
    assert_eq!(plain("").split(Some(","), None).len(), 1);
}

#[test]
fn split_limits_count_from_the_requested_end() {
    let s = plain("a b c d");
    let left = s.split(None, Some(1));
    assert_eq!(left.len(), 2);
    assert_eq!(left[1], plain("b c d"));

    let right = s.rsplit(None, Some(1));
    assert_eq!(right.len(), 2);
    assert_eq!(right[0], plain("a b c"));
    assert_eq!(right[1], plain("d"));

    let pieces = plain("a,b,c").rsplit(Some(","), Some(1));
    assert_eq!(pieces[0], plain("a,b"));
    assert_eq!(pieces[1], plain("c"));
}

#[test]
fn rsplit_resolves_overlapping_separators_from_the_right() {
    let s = plain("aaa");
    let right = s.rsplit(Some("aa"), None);
    assert_eq!(right, vec![plain("a"), plain("")]);
    // A left-to-right scan consumes the other occurrence.
    let left = s.split(Some("aa"), None);
    assert_eq!(left, vec![plain(""), plain("a")]);
}

#[test]
fn empty_separator_makes_no_splits() {
    let s = styled("ab", "x");
    assert_eq!(s.split(Some(""), None), vec![s.clone()]);
    assert_eq!(s.rsplit(Some(""), None), vec![s.clone()]);
}

#[test]
fn split_preserves_word_spans() {
    let s = styled("one two", "x");
    let words = s.split(None, None);
    assert_eq!(words, vec![styled("one", "x"), styled("two", "x")]);
}

#[test]
fn splitlines_handles_all_line_endings() {
    let s = plain("a\nb\r\nc\rd");
    let lines = s.splitlines(false);
    assert_eq!(lines, vec![plain("a"), plain("b"), plain("c"), plain("d")]);

    let kept = s.splitlines(true);
    assert_eq!(kept[0], plain("a\n"));
    assert_eq!(kept[1], plain("b\r\n"));
    assert_eq!(kept[2], plain("c\r"));
    assert_eq!(kept[3], plain("d"));

    // No empty final line after a trailing terminator.
    assert_eq!(plain("x\n").splitlines(false), vec![plain("x")]);
}

#[test]
fn strip_preserves_interior_spans() {
    let s = plain("  ") + styled("ab", "x") + plain("  ");
    assert_eq!(s.strip(None), styled("ab", "x"));
    assert_eq!(s.lstrip(None).plain(), "ab  ");
    assert_eq!(s.rstrip(None).plain(), "  ab");

    let csv = styled("--ab--", "x");
    assert_eq!(csv.strip(Some("-")), styled("ab", "x"));
}

#[test]
fn case_maps_preserve_spans() {
    let s = styled("hello", "a") + plain(" WORLD");
    assert_eq!(s.upper().plain(), "HELLO WORLD");
    assert_eq!(s.lower().plain(), "hello world");
    assert_eq!(s.swapcase().plain(), "HELLO world");
    assert_eq!(s.upper().flatten()[0], ("HELLO".to_owned(), "a".to_owned()));
}

#[test]
fn capitalize_uppercases_only_the_first_character() {
    let s = styled("hello", "a") + plain(" world");
    assert_eq!(s.capitalize().plain(), "Hello world");
    assert!(plain("").capitalize().is_empty());
}

#[test]
fn title_tracks_words_across_spans() {
    let s = styled("he", "a") + styled("llo wo", "b") + plain("RLD");
    let titled = s.title();
    assert_eq!(titled.plain(), "Hello World");
    // The span structure is untouched.
    assert_eq!(titled.flatten().len(), s.flatten().len());
}

#[test]
fn padding_is_unstyled() {
    let s = styled("ab", "x");
    assert_eq!(
        s.ljust(4, '.').flatten(),
        vec![
            ("ab".to_owned(), "x".to_owned()),
            ("..".to_owned(), String::new()),
        ]
    );
    assert_eq!(s.rjust(4, '.').plain(), "..ab");
    assert_eq!(s.center(5, '.').plain(), ".ab..");
    assert_eq!(s.zfill(4).plain(), "00ab");
    // Already wide enough: unchanged.
    assert_eq!(s.ljust(2, '.'), s);
}

#[test]
fn padding_counts_characters_not_bytes() {
    let s = plain("caf\u{e9}");
    assert_eq!(s.ljust(6, '.').plain(), "caf\u{e9}..");
}

#[test]
fn join_uses_the_separator_style() {
    let sep = styled(", ", "punct");
    let joined = sep.join([plain("a"), styled("b", "x")]);
    assert_eq!(joined.plain(), "a, b");
    assert_eq!(
        joined.flatten(),
        vec![
            ("a".to_owned(), String::new()),
            (", ".to_owned(), "punct".to_owned()),
            ("b".to_owned(), "x".to_owned()),
        ]
    );
    assert!(sep.join(Vec::<StyledString>::new()).is_empty());
}

#[test]
fn classification_predicates() {
    assert!(plain("abc").is_alphabetic());
    assert!(!plain("ab1").is_alphabetic());
    assert!(plain("ab1").is_alphanumeric());
    assert!(plain("123").is_numeric());
    assert!(plain(" \t\n").is_whitespace());
    assert!(plain("ABC1").is_uppercase());
    assert!(!plain("123").is_uppercase());
    assert!(plain("abc1").is_lowercase());
    assert!(plain("abc").is_ascii());
    assert!(!plain("caf\u{e9}").is_ascii());
    // Empty strings fail every predicate except ASCII.
    assert!(!plain("").is_alphabetic());
    assert!(plain("").is_ascii());
}

#[test]
fn render_emits_markup_only_at_transitions() {
    let mut sheet = StyleSheet::new();
    sheet += Rule::new("message", [("weight", "bold")].into_iter().collect());

    let markup = TagMarkup::new()
        .with_fallback(Expansion::new("<%p value='%v'>", "</%p>").with_flag_forms("<%p>", "</%p>"));

    let s = styled("foo", "message") + plain("bar");
    assert_eq!(
        s.render(&sheet, markup.clone()),
        "<weight value='bold'>foo</weight>bar"
    );

    // Two runs with the same resolved properties share one span.
    let merged = styled("foo", "message") + styled("baz", "message");
    assert_eq!(
        merged.render(&sheet, markup),
        "<weight value='bold'>foobaz</weight>"
    );
}

#[test]
fn render_resolves_nested_contexts() {
    let mut sheet = StyleSheet::new();
    sheet += Rule::new("outer", [("fg", "red")].into_iter().collect());
    sheet += Rule::new("outer.inner", [("fg", "blue")].into_iter().collect());

    let markup =
        TagMarkup::new().with_fallback(Expansion::new("<%p=%v>", "</%p>"));
    let s = StyledString::styled(plain("a") + styled("b", "inner") + plain("c"), "outer");
    assert_eq!(s.render(&sheet, markup), "<fg=red>a</fg><fg=blue>b</fg><fg=red>c</fg>");
}

#[test]
fn substitute_on_plain_text() {
    let pattern = Regex::new("o").unwrap();
    let s = plain("hello world");
    let out = s.substitute(&pattern, "0", 0).unwrap();
    assert_eq!(out, plain("hell0 w0rld"));

    let first_only = s.substitute(&pattern, "0", 1).unwrap();
    assert_eq!(first_only.plain(), "hell0 world");
}

#[test]
fn substitute_literal_takes_the_style_at_the_match() {
    let pattern = Regex::new("world").unwrap();
    let s = styled("hello", "a") + plain(" ") + styled("world", "b");
    let out = s.substitute(&pattern, "there", 0).unwrap();
    assert_eq!(out, styled("hello", "a") + plain(" ") + styled("there", "b"));
}

#[test]
fn substitute_backrefs_keep_the_matched_spans() {
    let pattern = Regex::new("(world)").unwrap();
    let s = plain("say ") + styled("world", "b");
    let out = s.substitute(&pattern, r"[\1]", 0).unwrap();
    assert_eq!(out.plain(), "say [world]");
    // The brackets take the match style; the matched text keeps its own.
    assert_eq!(
        out,
        plain("say ") + styled("[", "b") + styled("world", "b") + styled("]", "b")
    );
}

#[test]
fn substitute_keeps_the_root_style_of_a_single_leaf_subject() {
    let pattern = Regex::new("a").unwrap();
    let s = styled("aaa", "red");
    let out = s.substitute(&pattern, "X", 1).unwrap();
    assert_eq!(out.plain(), "Xaa");
    assert_eq!(out, styled("Xaa", "red"));
}

#[test]
fn substitute_supports_named_groups() {
    let pattern = Regex::new("(?P<word>w\\w+)").unwrap();
    let s = plain("hello world");
    let out = s.substitute(&pattern, r"<\g<word>>", 0).unwrap();
    assert_eq!(out.plain(), "hello <world>");
}

#[test]
fn substitute_expands_replacement_escapes() {
    let pattern = Regex::new(" ").unwrap();
    let out = plain("a b").substitute(&pattern, r"\t", 0).unwrap();
    assert_eq!(out.plain(), "a\tb");
}

#[test]
fn substitute_rejects_unsupported_escapes() {
    let pattern = Regex::new("x").unwrap();
    assert_eq!(
        plain("x").substitute(&pattern, r"\x41", 0).unwrap_err(),
        Error::UnsupportedEscape { escape: 'x' }
    );
    assert_eq!(
        plain("x").substitute(&pattern, r"\9", 0).unwrap_err(),
        Error::UnknownGroup {
            group: "9".to_owned()
        }
    );
}

#[test]
fn substitute_zero_width_matches_take_the_preceding_style() {
    let pattern = Regex::new("").unwrap();
    let s = styled("ab", "x") + plain("cd");
    let out = s.substitute(&pattern, "-", 1).unwrap();
    assert_eq!(out.plain(), "-abcd");
    // The inserted text coalesces with the run whose style it took.
    assert_eq!(
        out.flatten(),
        vec![
            ("-ab".to_owned(), "x".to_owned()),
            ("cd".to_owned(), String::new()),
        ]
    );

    // All positions, on an unstyled subject.
    let all = plain("ab").substitute(&pattern, "-", 0).unwrap();
    assert_eq!(all.plain(), "-a-b-");
}

#[test]
fn normalize_holds_its_invariants_for_random_trees() {
    struct Lcg(u64);
    impl Lcg {
        fn new(seed: u64) -> Self {
            Self(seed)
        }
        fn next_u32(&mut self) -> u32 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
            (self.0 >> 32) as u32
        }
        fn next_usize(&mut self, max: usize) -> usize {
            if max == 0 {
                0
            } else {
                (self.next_u32() as usize) % max
            }
        }
    }

    fn random_tree(rng: &mut Lcg, depth: usize) -> StyledString {
        let texts = ["", "x", "yy", "z z"];
        let styles = ["a", "b", "c"];
        let mut node = StyledString::new();
        let children = 1 + rng.next_usize(4);
        for _ in 0..children {
            if depth > 0 && rng.next_usize(3) == 0 {
                let sub = random_tree(rng, depth - 1);
                if rng.next_usize(4) < 3 {
                    node += StyledString::styled(sub, styles[rng.next_usize(3)]);
                } else {
                    node += sub;
                }
            } else {
                node += texts[rng.next_usize(4)];
            }
        }
        node
    }

    let mut rng = Lcg::new(0x1234_5678_9abc_def0);
    for case in 0..300 {
        let tree = random_tree(&mut rng, 3);
        let mut normalized = tree.clone();
        normalized.normalize();
        assert!(normalized.is_normalized(), "case {case}");
        assert_eq!(normalized.plain(), tree.plain(), "case {case}");
        assert_eq!(normalized.flatten(), tree.flatten(), "case {case}");
        assert_eq!(normalized, tree, "case {case}");
        assert_invariants(&normalized);

        // Normalizing again changes nothing structurally.
        let mut twice = normalized.clone();
        twice.normalize();
        assert_eq!(twice.style(), normalized.style(), "case {case}");
        assert_eq!(twice.children(), normalized.children(), "case {case}");

        // Slices recombine losslessly at every character boundary.
        let plain_text = normalized.plain();
        for (offset, _) in plain_text.char_indices() {
            let recombined =
                normalized.slice(..offset).unwrap() + normalized.slice(offset..).unwrap();
            assert_eq!(recombined, normalized, "case {case} offset {offset}");
        }
    }
}
