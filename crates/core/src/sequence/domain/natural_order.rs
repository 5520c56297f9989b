use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use super::frame_source::FrameFile;

/// Case-normalized sort key that orders embedded integers by value.
///
/// `frame_9.png` sorts before `frame_10.png`, and `Shot1.PNG` compares equal
/// to `shot1.png`. Digit runs of any length are compared without parsing, so
/// long numeric suffixes cannot overflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NaturalKey(String);

impl NaturalKey {
    pub fn new(name: &str) -> Self {
        Self(name.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for NaturalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_natural(&self.0, &other.0)
    }
}

impl PartialOrd for NaturalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compares two strings, treating each run of ASCII digits as one number.
///
/// Leading zeros do not affect the numeric value, so `f01` and `f1` compare
/// equal. No case folding happens here; see [`NaturalKey`].
pub fn compare_natural(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let run_a = take_digits(&mut a);
                let run_b = take_digits(&mut b);
                match compare_digit_runs(&run_a, &run_b) {
                    Ordering::Equal => {}
                    unequal => return unequal,
                }
            }
            (Some(ca), Some(cb)) => {
                if ca != cb {
                    return ca.cmp(&cb);
                }
                a.next();
                b.next();
            }
        }
    }
}

/// Orders frames for playback by natural comparison of their lower-cased
/// file names.
///
/// The sort is stable: names with equal keys keep their incoming relative
/// order.
pub fn resolve_order(mut frames: Vec<FrameFile>) -> Vec<FrameFile> {
    frames.sort_by_cached_key(|frame| NaturalKey::new(&frame.name));
    frames
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        run.push(c);
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    fn frames(names: &[&str]) -> Vec<FrameFile> {
        names
            .iter()
            .map(|name| FrameFile::new(PathBuf::from("frames").join(name)))
            .collect()
    }

    fn names(frames: &[FrameFile]) -> Vec<&str> {
        frames.iter().map(|f| f.name.as_str()).collect()
    }

    #[rstest]
    #[case("f2.png", "f10.png", Ordering::Less)]
    #[case("frame_9.png", "frame_10.png", Ordering::Less)]
    #[case("shot_21.png", "shot_4.png", Ordering::Greater)]
    #[case("a.png", "a.png", Ordering::Equal)]
    #[case("f007.png", "f7.png", Ordering::Equal)]
    #[case("f007.png", "f8.png", Ordering::Less)]
    #[case("a1b2.png", "a1b10.png", Ordering::Less)]
    #[case("a.png", "b.png", Ordering::Less)]
    #[case("frame", "frame1", Ordering::Less)]
    #[case(
        "x_123456789012345678901234567890.png",
        "x_123456789012345678901234567891.png",
        Ordering::Less
    )]
    fn test_compare_natural(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(compare_natural(a, b), expected);
        assert_eq!(compare_natural(b, a), expected.reverse());
    }

    #[test]
    fn test_numeric_suffixes_sort_by_value() {
        let ordered = resolve_order(frames(&["f2.png", "f10.png", "f1.png"]));
        assert_eq!(names(&ordered), vec!["f1.png", "f2.png", "f10.png"]);
    }

    #[test]
    fn test_natural_order_is_not_lexicographic() {
        let ordered = resolve_order(frames(&["shot_3.png", "shot_21.png", "shot_4.png"]));
        assert_eq!(
            names(&ordered),
            vec!["shot_3.png", "shot_4.png", "shot_21.png"]
        );
    }

    #[test]
    fn test_padding_does_not_affect_order() {
        let ordered = resolve_order(frames(&["f010.png", "f9.png", "f0001.png"]));
        assert_eq!(names(&ordered), vec!["f0001.png", "f9.png", "f010.png"]);
    }

    #[test]
    fn test_key_ignores_case() {
        assert_eq!(NaturalKey::new("Shot1.PNG"), NaturalKey::new("shot1.png"));
        assert_eq!(NaturalKey::new("Shot1.PNG").as_str(), "shot1.png");

        let ordered = resolve_order(frames(&["B2.png", "a10.png", "A3.png"]));
        assert_eq!(names(&ordered), vec!["A3.png", "a10.png", "B2.png"]);
    }

    #[test]
    fn test_case_duplicates_keep_incoming_order() {
        let ordered = resolve_order(frames(&["IMG1.png", "img1.png", "Img1.png", "img0.png"]));
        assert_eq!(
            names(&ordered),
            vec!["img0.png", "IMG1.png", "img1.png", "Img1.png"]
        );

        let reversed = resolve_order(frames(&["Img1.png", "img1.png", "IMG1.png"]));
        assert_eq!(names(&reversed), vec!["Img1.png", "img1.png", "IMG1.png"]);
    }

    #[test]
    fn test_exporter_style_names() {
        let ordered = resolve_order(frames(&[
            "events_frame10.png",
            "events_frame2.png",
            "events_frame1.png",
            "events_frame100.png",
        ]));
        assert_eq!(
            names(&ordered),
            vec![
                "events_frame1.png",
                "events_frame2.png",
                "events_frame10.png",
                "events_frame100.png",
            ]
        );
    }

    #[test]
    fn test_resolve_empty_is_empty() {
        assert!(resolve_order(Vec::new()).is_empty());
    }

    #[test]
    fn test_ascending_for_many_numbers() {
        let input: Vec<String> = (0..250).rev().map(|i| format!("p{i}.png")).collect();
        let refs: Vec<&str> = input.iter().map(String::as_str).collect();
        let ordered = resolve_order(frames(&refs));
        let expected: Vec<String> = (0..250).map(|i| format!("p{i}.png")).collect();
        assert_eq!(names(&ordered), expected);
    }
}
