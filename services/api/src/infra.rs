use chrono::NaiveDate;
use equi::config::AssessmentConfig;
use equi::error::AppError;
use equi::workflows::assessment::{
    AssessmentService, ScoringConfig, StatementUpload, TemplateStatementExtractor,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type StatementService = AssessmentService<TemplateStatementExtractor>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn build_assessment_service(config: &AssessmentConfig) -> Arc<StatementService> {
    Arc::new(AssessmentService::new(
        Arc::new(TemplateStatementExtractor),
        ScoringConfig::default(),
        config.score_seed,
    ))
}

/// Load statement files from disk in argument order.
pub(crate) fn read_uploads<P: AsRef<Path>>(
    paths: &[P],
    bank: Option<&str>,
    password: Option<&str>,
) -> Result<Vec<StatementUpload>, AppError> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let bytes = std::fs::read(path)?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            let mut upload = StatementUpload::new(file_name, bytes);
            upload.bank = bank.map(str::to_string);
            upload.password = password.map(str::to_string);
            Ok(upload)
        })
        .collect()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_reports_the_raw_value() {
        assert_eq!(
            parse_date(" 2026-01-15 "),
            Ok(NaiveDate::from_ymd_opt(2026, 1, 15).expect("valid date"))
        );
        let err = parse_date("15/01/2026").expect_err("wrong format");
        assert!(err.contains("15/01/2026"));
    }

    #[test]
    fn missing_statement_files_surface_io_errors() {
        let err = read_uploads(&["/definitely/not/here.png"], None, None)
            .expect_err("missing file");
        assert!(matches!(err, AppError::Io(_)));
    }
}
