// ==========================================
// 物资申领报表 - 命令行入口
// ==========================================
// 用法:
//   requisition-report <user_id> [--db <path>] [--json-logs] [--filters <json>]
//
// 输出: 过滤器定义与报表结果（JSON）
// ==========================================

use anyhow::{bail, Context};
use requisition_report::api::{ApiError, ReportFilters};
use requisition_report::app::{get_default_db_path, AppState};
use requisition_report::i18n::t_with_args;
use requisition_report::logging;
use serde_json::json;

struct CliArgs {
    user_id: String,
    db_path: Option<String>,
    json_logs: bool,
    filters: ReportFilters,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut user_id = None;
    let mut db_path = None;
    let mut json_logs = false;
    let mut filters = ReportFilters::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => db_path = Some(args.next().context("--db 缺少路径参数")?),
            "--json-logs" => json_logs = true,
            "--filters" => {
                let raw = args.next().context("--filters 缺少 JSON 参数")?;
                filters = ReportFilters::from_json(&raw).context("--filters 解析失败")?;
            }
            flag if flag.starts_with("--") => bail!("未知参数: {}", flag),
            value => {
                if user_id.is_some() {
                    bail!("只能指定一个 user_id");
                }
                user_id = Some(value.to_string());
            }
        }
    }

    let user_id = match user_id {
        Some(id) => id,
        None => bail!(
            "用法: requisition-report <user_id> [--db <path>] [--json-logs] [--filters <json>]"
        ),
    };

    Ok(CliArgs {
        user_id,
        db_path,
        json_logs,
        filters,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args()?;

    if args.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!(
        app = requisition_report::APP_NAME,
        version = requisition_report::VERSION,
        "启动"
    );

    let db_path = args.db_path.clone().unwrap_or_else(get_default_db_path);
    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    let selection = args.filters.to_selection();
    let outcome = async {
        let filters = state
            .report_api
            .get_filter_definitions(&args.user_id, Some(&selection))
            .await?;
        let report = state.report_api.get_report(&args.filters, &args.user_id).await?;
        Ok::<_, ApiError>((filters, report))
    }
    .await;

    match outcome {
        Ok((filters, report)) => {
            let output = json!({ "filters": filters, "report": report });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(ApiError::NotAuthorized { user_id }) => {
            bail!(t_with_args("error.not_authorized", &[("user_id", &user_id)]))
        }
        Err(ApiError::InvalidFilter { field, reason }) => {
            bail!(
                "{} ({})",
                t_with_args("error.invalid_filter", &[("field", &field)]),
                reason
            )
        }
        Err(e) => Err(e.into()),
    }
}
