//! Dashboard report over a merged frame shaped like the persisted table.

use access_report::{ReportOptions, build_report};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

fn merged_frame() -> DataFrame {
    DataFrame::new(vec![
        Series::new("patient_id".into(), vec![1i64, 2, 3, 4]).into_column(),
        Series::new("country".into(), vec!["France", "Spain", "France", "Italy"]).into_column(),
        Series::new("gender".into(), vec!["F", "M", "F", "F"]).into_column(),
        Series::new("age".into(), vec![30i64, 50, 40, 50]).into_column(),
        Series::new(
            "accessibility_type".into(),
            vec!["visual", "visual", "motor", "hearing"],
        )
        .into_column(),
        Series::new(
            "device_type".into(),
            vec!["screen reader", "tablet", "screen reader", "tablet"],
        )
        .into_column(),
        Series::new(
            "issue_type".into(),
            vec![Some("navigation"), None, Some("contrast"), Some("navigation")],
        )
        .into_column(),
        Series::new("satisfaction_score".into(), vec![4.0, 2.0, 3.0, 5.0]).into_column(),
    ])
    .expect("frame")
}

#[test]
fn dashboard_json_snapshot() {
    let options = ReportOptions {
        preview_rows: 2,
        age_bins: 2,
        ..ReportOptions::default()
    };
    let report = build_report(&merged_frame(), &options);
    let json = serde_json::to_string_pretty(&report).expect("serialize");
    insta::assert_snapshot!(json, @r#"
    {
      "country_filter": null,
      "available_countries": [
        "France",
        "Italy",
        "Spain"
      ],
      "total_rows": 4,
      "selected_rows": 4,
      "kpis": {
        "patients": 4,
        "countries": 3,
        "accessibility_types": 3,
        "average_satisfaction": 3.5
      },
      "top_countries": [
        {
          "label": "France",
          "count": 2
        },
        {
          "label": "Italy",
          "count": 1
        },
        {
          "label": "Spain",
          "count": 1
        }
      ],
      "satisfaction_by_accessibility": [
        {
          "label": "hearing",
          "mean": 5.0,
          "count": 1
        },
        {
          "label": "motor",
          "mean": 3.0,
          "count": 1
        },
        {
          "label": "visual",
          "mean": 3.0,
          "count": 2
        }
      ],
      "gender_balance": [
        {
          "label": "F",
          "count": 3,
          "percent": 75.0
        },
        {
          "label": "M",
          "count": 1,
          "percent": 25.0
        }
      ],
      "issue_types": [
        {
          "label": "navigation",
          "count": 2
        },
        {
          "label": "contrast",
          "count": 1
        }
      ],
      "age_histogram": [
        {
          "lower": 30.0,
          "upper": 40.0,
          "count": 1
        },
        {
          "lower": 40.0,
          "upper": 50.0,
          "count": 3
        }
      ],
      "device_usage": [
        {
          "label": "screen reader",
          "count": 2
        },
        {
          "label": "tablet",
          "count": 2
        }
      ],
      "preview": {
        "columns": [
          "patient_id",
          "country",
          "gender",
          "age",
          "accessibility_type",
          "device_type",
          "issue_type",
          "satisfaction_score"
        ],
        "rows": [
          [
            "1",
            "France",
            "F",
            "30",
            "visual",
            "screen reader",
            "navigation",
            "4"
          ],
          [
            "2",
            "Spain",
            "M",
            "50",
            "visual",
            "tablet",
            "",
            "2"
          ]
        ]
      }
    }
    "#);
}

#[test]
fn country_filter_narrows_every_breakdown() {
    let options = ReportOptions::default().with_country("France");
    let report = build_report(&merged_frame(), &options);

    assert_eq!(report.selected_rows, 2);
    assert_eq!(report.kpis.patients, 2);
    assert_eq!(report.kpis.average_satisfaction, Some(3.5));
    assert_eq!(report.top_countries.len(), 1);
    assert_eq!(report.device_usage.len(), 1);
    assert_eq!(report.device_usage[0].label, "screen reader");
    assert_eq!(report.available_countries, vec!["France", "Italy", "Spain"]);
    assert_eq!(report.age_histogram.len(), 20);
    assert_eq!(
        report.age_histogram.iter().map(|bin| bin.count).sum::<usize>(),
        2
    );
}
