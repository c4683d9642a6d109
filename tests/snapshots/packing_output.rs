use insta::{assert_json_snapshot, assert_snapshot};

use histopack::cli::output::render_tsv;
use histopack::core::{Capacity, HeuristicKind, ItemLimit, Shape, SizeHistogram, pack};

fn scenario() -> SizeHistogram {
    [(Shape::new(3, 5), 2), (Shape::new(1, 1), 3)]
        .into_iter()
        .collect()
}

#[test]
fn test_strategies_json() {
    let result = pack(
        &scenario(),
        Capacity::new(4, 6),
        ItemLimit::Unbounded,
        &HeuristicKind::Product,
    )
    .unwrap();
    assert_json_snapshot!(result.strategies, @r#"
[
  {
    "items": [
      {
        "dim1": 3,
        "dim2": 5
      },
      {
        "dim1": 1,
        "dim2": 1
      }
    ],
    "repeat_count": 2
  },
  {
    "items": [
      {
        "dim1": 1,
        "dim2": 1
      }
    ],
    "repeat_count": 1
  }
]
"#);
}

#[test]
fn test_strategies_tsv() {
    let result = pack(
        &scenario(),
        Capacity::new(4, 6),
        ItemLimit::Unbounded,
        &HeuristicKind::Product,
    )
    .unwrap();
    let tsv = render_tsv(&["repeat_count", "items"], &result.strategies, |s| {
        vec![
            s.repeat_count.to_string(),
            s.items.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "),
        ]
    });
    assert_snapshot!(tsv, @"repeat_count\titems\n2\t(3, 5) (1, 1)\n1\t(1, 1)");
}
