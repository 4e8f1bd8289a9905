use iseeu_dashboard::analytics::{AgeBracket, Gender, build_gender_ratio, build_hourly_series};
use iseeu_dashboard::camera::{camera_ids, filter_by_camera};
use iseeu_dashboard::dashboard::DashboardState;
use iseeu_dashboard::error::AppError;
use iseeu_dashboard::period::{PeriodWindow, filter_by_period};
use iseeu_dashboard::record::{CountRecord, RecordTime};
use iseeu_dashboard::refresh::refresh_now;
use iseeu_dashboard::render::{ChartMode, ChartSpec};
use iseeu_dashboard::source::mock::{MockFetchBehavior, MockRecordSource};
use iseeu_dashboard::source::parse_records;
use std::sync::{Arc, RwLock};
use time::macros::{datetime, offset};
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

fn zero_record(cctv_id: u32, timestamp: RecordTime) -> CountRecord {
    CountRecord {
        cctv_id,
        timestamp,
        male_minor: 0,
        female_minor: 0,
        male_young_adult: 0,
        female_young_adult: 0,
        male_middle_aged: 0,
        female_middle_aged: 0,
    }
}

#[tokio::test]
async fn mock_fetch_drives_summary_and_chart_switching() -> Result<(), AppError> {
    let now = OffsetDateTime::now_utc();
    let records = vec![
        CountRecord {
            male_young_adult: 5,
            female_young_adult: 3,
            ..zero_record(1, RecordTime::Zoned(now))
        },
        CountRecord {
            female_middle_aged: 2,
            ..zero_record(2, RecordTime::Zoned(now))
        },
        // outside every window
        CountRecord {
            male_minor: 50,
            ..zero_record(1, RecordTime::Zoned(now - Duration::days(90)))
        },
    ];
    let source = Arc::new(MockRecordSource::with_records(records));
    let dashboard = Arc::new(RwLock::new(DashboardState::new(offset!(+9))));

    assert!(refresh_now(&dashboard, source.clone()).await?);
    {
        let guard = dashboard.read().map_err(|_| AppError::StateLock)?;
        let view = guard.view().expect("view after refresh");
        assert_eq!(view.cameras, vec![1, 2]);
        assert_eq!(view.stats.total_visitors, 8);
        assert_eq!(view.stats.main_age_range, Some(AgeBracket::YoungAdult));
        assert_eq!(view.stats.main_gender, Some(Gender::Male));
        assert!(matches!(guard.canvas().current(), Some(ChartSpec::Line(_))));
    }

    let ticket = {
        let mut guard = dashboard.write().map_err(|_| AppError::StateLock)?;
        guard.next_chart()
    };
    assert!(iseeu_dashboard::refresh::run_refresh(&dashboard, source.clone(), ticket).await?);

    let guard = dashboard.read().map_err(|_| AppError::StateLock)?;
    assert_eq!(guard.selection().chart_mode, ChartMode::GenderRatio);
    let Some(ChartSpec::Pie(pie)) = guard.canvas().current() else {
        panic!("expected pie chart after switching mode");
    };
    assert_eq!(pie.legend, vec!["남성 62.5%", "여성 37.5%"]);
    assert_eq!(source.fetch_count(), 2);
    Ok(())
}

#[tokio::test]
async fn failed_fetch_shows_empty_dashboard() -> Result<(), AppError> {
    let source = Arc::new(MockRecordSource::new(vec![MockFetchBehavior::fail()]));
    let dashboard = Arc::new(RwLock::new(DashboardState::new(offset!(+9))));

    assert!(refresh_now(&dashboard, source).await?);

    let guard = dashboard.read().map_err(|_| AppError::StateLock)?;
    let view = guard.view().expect("view after refresh");
    assert_eq!(view.stats.total_visitors, 0);
    assert_eq!(view.stats.peak_time, "00:00-00:00");
    assert_eq!(view.stats.main_age_range_label(), "N/A");
    assert_eq!(view.stats.main_gender_label(), "N/A");
    Ok(())
}

#[test]
fn backend_payload_flows_through_filters() -> Result<(), Box<dyn std::error::Error>> {
    let body = r#"[
        {"cctv_id": 1, "timestamp": "2025-02-18T08:15:00", "male_young_adult": 5, "female_young_adult": 3,
         "male_middle_aged": 0, "female_middle_aged": 0, "male_minor": 0, "female_minor": 0},
        {"cctv_id": 1, "timestamp": "2025-02-18T14:40:00", "male_minor": 10},
        {"cctv_id": 1, "timestamp": "2025-02-12T11:00:00", "female_minor": 7},
        {"cctv_id": 3, "timestamp": "2025-02-18T14:10:00", "female_minor": 1}
    ]"#;
    let records = parse_records(body)?;
    let now: PrimitiveDateTime = datetime!(2025-02-18 20:00);

    assert_eq!(camera_ids(&records), vec![1, 3]);

    let camera_one = filter_by_camera(&records, 1);
    let today = filter_by_period(&camera_one, PeriodWindow::Today, now, offset!(+9));
    let week = filter_by_period(&camera_one, PeriodWindow::Past7Days, now, offset!(+9));
    assert_eq!(today.len(), 2);
    assert_eq!(week.len(), 3);

    let hourly = build_hourly_series(&today, offset!(+9));
    let ratio = build_gender_ratio(&today);
    let summary = iseeu_dashboard::analytics::summarize(&today, offset!(+9));

    assert_eq!(summary.total_visitors, 18);
    assert_eq!(summary.peak_time, "14:00 - 15:00");
    assert_eq!(summary.main_age_range, Some(AgeBracket::Minor));
    assert_eq!(hourly.total.iter().sum::<u64>(), summary.total_visitors);
    assert_eq!(ratio.male + ratio.female, summary.total_visitors);
    Ok(())
}
