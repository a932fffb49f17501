use ancestry_clusters::{merge_clusters, segment_calls, Cluster, Coord, PositionCall};
use rstest::rstest;

fn cl(chrom: &str, start: Coord, end: Coord, anc: &str) -> Cluster {
    Cluster::new(chrom, start, end, anc, "sample1.csv")
}

#[rstest]
#[case::short_interloper(
    vec![cl("chr1", 1, 100, "A"), cl("chr1", 101, 110, "B"), cl("chr1", 111, 300, "A")],
    50,
    vec![cl("chr1", 1, 300, "A")]
)]
#[case::long_interloper(
    vec![cl("chr1", 1, 100, "A"), cl("chr1", 101, 160, "B"), cl("chr1", 161, 300, "A")],
    50,
    vec![cl("chr1", 1, 100, "A"), cl("chr1", 101, 160, "B"), cl("chr1", 161, 300, "A")]
)]
#[case::zero_threshold(
    vec![cl("chr1", 1, 100, "A"), cl("chr1", 101, 102, "B"), cl("chr1", 103, 300, "A")],
    0,
    vec![cl("chr1", 1, 100, "A"), cl("chr1", 101, 102, "B"), cl("chr1", 103, 300, "A")]
)]
#[case::run_of_interlopers(
    vec![
        cl("chr1", 1, 100, "A"),
        cl("chr1", 101, 105, "B"),
        cl("chr1", 106, 108, "C"),
        cl("chr1", 109, 200, "A"),
        cl("chr1", 201, 400, "C"),
    ],
    10,
    vec![cl("chr1", 1, 200, "A"), cl("chr1", 201, 400, "C")]
)]
#[case::unsorted_input(
    vec![cl("chr1", 111, 300, "A"), cl("chr1", 1, 100, "A"), cl("chr1", 101, 110, "B")],
    50,
    vec![cl("chr1", 1, 300, "A")]
)]
fn merge_cases(#[case] input: Vec<Cluster>, #[case] threshold: Coord, #[case] expected: Vec<Cluster>) {
    assert_eq!(merge_clusters(input, threshold).unwrap(), expected);
}

#[rstest]
#[case::other_source(Cluster::new("chr1", 101, 110, "B", "sample2.csv"))]
#[case::other_chromosome(cl("chr2", 101, 110, "B"))]
fn interloper_in_other_group_does_not_count(#[case] elsewhere: Cluster) {
    let input = vec![
        cl("chr1", 1, 100, "A"),
        elsewhere.clone(),
        cl("chr1", 200, 300, "A"),
    ];
    let merged = merge_clusters(input, 50).unwrap();
    assert!(merged.contains(&cl("chr1", 1, 300, "A")));
    assert!(merged.contains(&elsewhere));
    assert_eq!(merged.len(), 2);
}

#[test]
fn adjacent_coordinates_in_different_groups_stay_apart() {
    let input = vec![
        Cluster::new("chr1", 1, 100, "A", "s1"),
        Cluster::new("chr1", 101, 200, "A", "s2"),
        Cluster::new("chr2", 201, 300, "A", "s1"),
    ];
    let merged = merge_clusters(input.clone(), 1_000).unwrap();
    assert_eq!(merged.len(), 3);
    for cluster in &input {
        assert!(merged.contains(cluster));
    }
}

fn noisy_clusters() -> Vec<Cluster> {
    let labels = ["A", "B", "A", "A", "C", "B", "B", "A", "C", "C", "A", "B"];
    let lengths = [120, 5, 80, 30, 9, 200, 14, 3, 150, 60, 7, 90];
    let mut start = 1;
    let mut clusters = Vec::new();
    for (source, chrom) in [("s1", "chr1"), ("s1", "chr2"), ("s2", "chr1")] {
        for (label, len) in labels.iter().zip(lengths) {
            clusters.push(Cluster::new(chrom, start, start + len, *label, source));
            start += len + 1;
        }
    }
    clusters
}

#[rstest]
fn merged_neighbours_never_share_a_label(#[values(0, 5, 10, 50, 100, 500)] threshold: Coord) {
    let merged = merge_clusters(noisy_clusters(), threshold).unwrap();
    for pair in merged.windows(2) {
        if pair[0].group_key() == pair[1].group_key() {
            assert_ne!(pair[0].ancestry, pair[1].ancestry, "{:?}", pair);
        }
    }
}

#[rstest]
fn merging_merged_output_is_stable(#[values(0, 10, 100)] threshold: Coord) {
    let once = merge_clusters(noisy_clusters(), threshold).unwrap();
    assert_eq!(merge_clusters(once.clone(), threshold).unwrap(), once);
    assert_eq!(merge_clusters(once.clone(), 0).unwrap(), once);
}

#[test]
fn short_segment_run_is_dropped_then_neighbours_merge() {
    let mut calls = Vec::new();
    calls.extend((1..=5).map(|p| PositionCall::new("chr1", p, "A", "ind1")));
    calls.extend((6..=7).map(|p| PositionCall::new("chr1", p, "B", "ind1")));
    calls.extend((8..=20).map(|p| PositionCall::new("chr1", p, "A", "ind1")));

    let (segments, _) = segment_calls(calls, 5).unwrap();
    assert_eq!(
        segments,
        vec![
            Cluster::new("chr1", 1, 5, "A", "ind1"),
            Cluster::new("chr1", 8, 20, "A", "ind1"),
        ]
    );

    let merged = merge_clusters(segments, 0).unwrap();
    assert_eq!(merged, vec![Cluster::new("chr1", 1, 20, "A", "ind1")]);
}
