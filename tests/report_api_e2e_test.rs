// ==========================================
// 报表 API 端到端测试
// ==========================================
// 测试目标: SQLite 仓储 + 引擎 + API 全链路
// ==========================================


use requisition_report::api::{ApiError, FieldFilter, ReportFilters};
use requisition_report::domain::{FilterSelection, RequisitionStatus};
use requisition_report::logging;
use test_helpers::{create_test_state, local_requisition, requisition, seed_scenario};

// ==========================================
// 可见范围 + 聚合
// ==========================================

#[tokio::test]
async fn test_department_summary_is_scoped() {
    logging::init_test();
    let (_temp_file, state) = create_test_state().unwrap();
    seed_scenario(&state).unwrap();

    let report = state
        .report_api
        .get_report(&ReportFilters::default(), "E1001")
        .await
        .unwrap();

    assert_eq!(report.by_department.len(), 1);
    let dept = &report.by_department[0];
    assert_eq!(dept.department_id, 10);
    assert_eq!(dept.department_name, "仓储部");
    assert_eq!(dept.count, 3);
    assert_eq!(dept.status_counts.len(), 2);
    assert_eq!(dept.status_counts["Completed"], 2);
    assert_eq!(dept.status_counts["PendingApproval"], 1);
    assert!(report.department(30).is_none());
}

#[tokio::test]
async fn test_station_without_directory_entry_uses_fallback() {
    let (_temp_file, state) = create_test_state().unwrap();
    seed_scenario(&state).unwrap();

    let report = state
        .report_api
        .get_report(&ReportFilters::default(), "E1001")
        .await
        .unwrap();

    let station_ids: Vec<i64> = report.by_station.iter().map(|s| s.station_id).collect();
    assert_eq!(station_ids, vec![5, 6]);

    let south = report.station(5).unwrap();
    assert_eq!(south.station_name, "南站");
    assert_eq!(south.count, 2);

    let unknown = report.station(6).unwrap();
    assert_eq!(unknown.station_name, "Station 6");
    assert_eq!(unknown.count, 1);
    assert!(report.station(8).is_none());
}

#[tokio::test]
async fn test_unassigned_keys_form_their_own_group() {
    let (_temp_file, state) = create_test_state().unwrap();
    seed_scenario(&state).unwrap();
    state
        .requisition_repo
        .insert(&requisition(
            6,
            (None, None),
            (Some(10), None),
            RequisitionStatus::Approved,
        ))
        .unwrap();

    let report = state
        .report_api
        .get_report(&ReportFilters::default(), "E1001")
        .await
        .unwrap();

    let unassigned_dept = report.department(0).unwrap();
    assert_eq!(unassigned_dept.count, 1);
    assert_eq!(unassigned_dept.department_name, "Department 0");

    let unassigned_station = report.station(0).unwrap();
    assert_eq!(unassigned_station.status_counts["Approved"], 1);
}

#[tokio::test]
async fn test_report_is_idempotent() {
    let (_temp_file, state) = create_test_state().unwrap();
    seed_scenario(&state).unwrap();

    let first = state
        .report_api
        .get_report(&ReportFilters::default(), "E1001")
        .await
        .unwrap();
    let second = state
        .report_api
        .get_report(&ReportFilters::default(), "E1001")
        .await
        .unwrap();
    assert_eq!(first, second);
}

// ==========================================
// 泄漏检查：报表总数只来自可见记录
// ==========================================

#[tokio::test]
async fn test_no_record_outside_scope_is_counted() {
    let (_temp_file, state) = create_test_state().unwrap();

    let visibility = &state.visibility_repo;
    visibility.upsert_user("E5001", None, true).unwrap();
    visibility.grant_department("E5001", 2).unwrap();
    visibility.grant_station("E5001", 13).unwrap();

    let statuses = RequisitionStatus::ALL;
    let records: Vec<_> = (1..=120)
        .map(|i: i64| {
            let issuing_dept = if i % 11 == 0 { None } else { Some(i % 5) };
            let delivery_dept = Some((i * 3) % 5);
            let issuing_station = Some(10 + i % 7);
            let delivery_station = if i % 13 == 0 { None } else { Some(10 + (i * 2) % 7) };
            test_helpers::requisition(
                i,
                (issuing_dept, issuing_station),
                (delivery_dept, delivery_station),
                statuses[(i as usize) % statuses.len()],
            )
        })
        .collect();
    state.requisition_repo.batch_insert(&records).unwrap();

    let expected = records
        .iter()
        .filter(|r| {
            r.issuing_department_id == Some(2)
                || r.delivery_department_id == Some(2)
                || r.issuing_station_id == Some(13)
                || r.delivery_station_id == Some(13)
        })
        .count() as u32;
    assert!(expected > 0 && expected < 120);

    let report = state
        .report_api
        .get_report(&ReportFilters::default(), "E5001")
        .await
        .unwrap();

    let by_department: u32 = report.by_department.iter().map(|s| s.count).sum();
    let by_station: u32 = report.by_station.iter().map(|s| s.count).sum();
    assert_eq!(by_department, expected);
    assert_eq!(by_station, expected);

    for summary in &report.by_department {
        assert_eq!(summary.count, summary.status_total());
    }
    for summary in &report.by_station {
        assert_eq!(summary.count, summary.status_total());
    }

    // 调用方过滤只能进一步收窄
    let filters = ReportFilters {
        department_ids: vec![0, 1, 3, 4],
        ..Default::default()
    };
    let narrowed = state
        .report_api
        .get_report(&filters, "E5001")
        .await
        .unwrap();
    let narrowed_total: u32 = narrowed.by_department.iter().map(|s| s.count).sum();
    assert!(narrowed_total <= expected);
}

// ==========================================
// 授权与过滤条件错误
// ==========================================

#[tokio::test]
async fn test_unknown_or_inactive_user_is_rejected() {
    let (_temp_file, state) = create_test_state().unwrap();
    seed_scenario(&state).unwrap();

    for user_id in ["E9999", "E4001", ""] {
        let result = state
            .report_api
            .get_report(&ReportFilters::default(), user_id)
            .await;
        assert!(
            matches!(result, Err(ApiError::NotAuthorized { .. })),
            "user_id={:?} should be rejected",
            user_id
        );
    }
}

#[tokio::test]
async fn test_unknown_sort_column_is_rejected() {
    let (_temp_file, state) = create_test_state().unwrap();
    seed_scenario(&state).unwrap();

    let filters = ReportFilters {
        sort_column: Some("NoSuchField".to_string()),
        ..Default::default()
    };
    match state.report_api.get_report(&filters, "E1001").await {
        Err(ApiError::InvalidFilter { field, .. }) => assert_eq!(field, "NoSuchField"),
        other => panic!("Expected InvalidFilter, got {:?}", other),
    }

    let filters = ReportFilters {
        field_filters: vec![FieldFilter {
            field: "weight".to_string(),
            value: "1".to_string(),
        }],
        ..Default::default()
    };
    assert!(matches!(
        state.report_api.get_report(&filters, "E1001").await,
        Err(ApiError::InvalidFilter { .. })
    ));
}

#[tokio::test]
async fn test_unknown_filter_key_is_rejected() {
    let (_temp_file, state) = create_test_state().unwrap();
    seed_scenario(&state).unwrap();

    let raw = r#"{"departmentId":[30],"sortColum":"NoSuchField"}"#;
    match ReportFilters::from_json(raw) {
        Err(ApiError::InvalidFilter { field, .. }) => assert_eq!(field, "departmentId"),
        other => panic!("Expected InvalidFilter, got {:?}", other),
    }

    // 过滤器定义给出的 propertyName 可以原样回传
    let defs = state
        .report_api
        .get_filter_definitions("E1001", None)
        .await
        .unwrap();
    let mut posted = serde_json::Map::new();
    posted.insert(defs[0].property_name.clone(), serde_json::json!([10]));
    posted.insert(defs[2].property_name.clone(), serde_json::json!(["Completed"]));
    let filters = ReportFilters::from_json(&serde_json::Value::Object(posted).to_string()).unwrap();

    let report = state.report_api.get_report(&filters, "E1001").await.unwrap();
    assert_eq!(report.by_department.len(), 1);
    assert_eq!(report.by_department[0].count, 2);
    assert_eq!(report.by_department[0].status_counts["Completed"], 2);
}

#[tokio::test]
async fn test_caller_filters_apply_after_scoping() {
    let (_temp_file, state) = create_test_state().unwrap();
    seed_scenario(&state).unwrap();

    let filters = ReportFilters {
        statuses: vec!["Completed".to_string()],
        search: Some("000002".to_string()),
        ..Default::default()
    };
    let rows = state
        .report_api
        .list_requisitions(&filters, "E1001")
        .await
        .unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.requisition_id).collect();
    assert_eq!(ids, vec![2]);

    let filters = ReportFilters {
        sort_column: Some("requisitionId".to_string()),
        descending: true,
        ..Default::default()
    };
    let rows = state
        .report_api
        .list_requisitions(&filters, "E1001")
        .await
        .unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.requisition_id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

// ==========================================
// 边界
// ==========================================

#[tokio::test]
async fn test_empty_store_and_empty_scope() {
    let (_temp_file, state) = create_test_state().unwrap();
    state.visibility_repo.upsert_user("E1001", None, true).unwrap();
    state.visibility_repo.grant_department("E1001", 10).unwrap();
    state.visibility_repo.upsert_user("E2001", None, true).unwrap();

    let report = state
        .report_api
        .get_report(&ReportFilters::default(), "E1001")
        .await
        .unwrap();
    assert!(report.is_empty());

    state
        .requisition_repo
        .insert(&local_requisition(1, 10, 5, RequisitionStatus::Draft))
        .unwrap();
    let report = state
        .report_api
        .get_report(&ReportFilters::default(), "E2001")
        .await
        .unwrap();
    assert!(report.is_empty());
}

#[tokio::test]
async fn test_report_json_field_names() {
    let (_temp_file, state) = create_test_state().unwrap();
    seed_scenario(&state).unwrap();

    let report = state
        .report_api
        .get_report(&ReportFilters::default(), "E1001")
        .await
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    let dept = &json["byDepartment"][0];
    assert_eq!(dept["departmentId"], 10);
    assert_eq!(dept["departmentName"], "仓储部");
    assert_eq!(dept["count"], 3);
    assert_eq!(dept["statusCounts"]["Completed"], 2);

    let station = &json["byStation"][0];
    assert_eq!(station["stationId"], 5);
    assert_eq!(station["stationName"], "南站");
    assert!(station["statusCounts"].is_object());
}

// ==========================================
// 过滤器定义
// ==========================================

#[tokio::test]
async fn test_filter_definitions_offer_only_visible_locations() {
    let (_temp_file, state) = create_test_state().unwrap();
    seed_scenario(&state).unwrap();

    let defs = state
        .report_api
        .get_filter_definitions("E3001", None)
        .await
        .unwrap();

    let names: Vec<&str> = defs.iter().map(|d| d.property_name.as_str()).collect();
    assert_eq!(names, vec!["departmentIds", "stationIds", "statuses"]);

    assert!(defs[0].options.is_empty());
    assert_eq!(defs[1].options.len(), 1);
    assert_eq!(defs[1].options[0].value, "7");
    assert_eq!(defs[1].options[0].text, "北站");
    assert_eq!(defs[2].options.len(), RequisitionStatus::ALL.len());

    let json = serde_json::to_value(&defs[1]).unwrap();
    assert_eq!(json["propertyName"], "stationIds");
    assert_eq!(json["filterType"], "dropdown");
    assert_eq!(json["isMultiSelect"], true);
}

#[tokio::test]
async fn test_filter_definitions_reflect_previous_selection() {
    let (_temp_file, state) = create_test_state().unwrap();
    seed_scenario(&state).unwrap();

    let submitted = ReportFilters {
        department_ids: vec![10],
        statuses: vec!["Draft".to_string()],
        ..Default::default()
    };
    let selection: FilterSelection = submitted.to_selection();
    let defs = state
        .report_api
        .get_filter_definitions("E1001", Some(&selection))
        .await
        .unwrap();

    assert_eq!(defs[0].selected_values(), vec!["10"]);
    assert_eq!(defs[2].selected_values(), vec!["Draft"]);

    assert!(matches!(
        state.report_api.get_filter_definitions("E9999", None).await,
        Err(ApiError::NotAuthorized { .. })
    ));
}
