use crate::config::RuleTestArgs;
use crate::core::adjudication::{
    parse_draw_rule, parse_resign_rule, test_rule, AdjudicationReport, DrawRule, ResignRule,
};
use crate::core::game_data::map_game_data;
use crate::core::pgn::read_games;
use crate::core::{GameData, Pipeline, Storage};
use crate::utils::error::{CaraError, Result};

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub verbose: bool,
    pub csv: Option<String>,
    pub json: bool,
}

/// read PGN → per-move data → replay against the rules → rendered report.
pub struct AdjudicationPipeline<S: Storage> {
    storage: S,
    source: String,
    resign_rule: Option<ResignRule>,
    draw_rule: Option<DrawRule>,
    options: ReportOptions,
}

impl<S: Storage> AdjudicationPipeline<S> {
    pub fn new(
        storage: S,
        source: impl Into<String>,
        resign_rule: Option<ResignRule>,
        draw_rule: Option<DrawRule>,
        options: ReportOptions,
    ) -> Self {
        Self {
            storage,
            source: source.into(),
            resign_rule,
            draw_rule,
            options,
        }
    }

    /// Rules are parsed up front so a typo fails before the file is read.
    pub fn from_args(storage: S, args: &RuleTestArgs) -> Result<Self> {
        let resign_rule = parse_resign_rule(&args.resign_rule)?;
        let draw_rule = parse_draw_rule(&args.draw_rule)?;

        Ok(Self::new(
            storage,
            &args.file,
            resign_rule,
            draw_rule,
            ReportOptions {
                verbose: args.verbose,
                csv: args.csv.clone(),
                json: args.json,
            },
        ))
    }

    async fn write_csv(&self, path: &str, report: &AdjudicationReport) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &report.games {
            writer.serialize(row)?;
        }
        let data = writer
            .into_inner()
            .map_err(|e| CaraError::Io(e.into_error()))?;

        self.storage
            .write_file(path, &data)
            .await
            .map_err(|e| match e {
                CaraError::Io(source) => CaraError::ReportWrite {
                    path: path.to_string(),
                    source,
                },
                other => other,
            })?;
        tracing::info!("Wrote {} game rows to {}", report.games.len(), path);
        Ok(())
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for AdjudicationPipeline<S> {
    type Extracted = Vec<GameData>;
    type Transformed = AdjudicationReport;

    async fn extract(&self) -> Result<Vec<GameData>> {
        let data = self.storage.read_file(&self.source).await?;
        let text = String::from_utf8_lossy(&data);

        let games = read_games(&text)?;
        tracing::debug!("Read {} games from {}", games.len(), self.source);

        map_game_data(&games)
    }

    async fn transform(&self, games: Vec<GameData>) -> Result<AdjudicationReport> {
        Ok(test_rule(
            &games,
            self.resign_rule.as_ref(),
            self.draw_rule.as_ref(),
        ))
    }

    async fn load(&self, report: AdjudicationReport) -> Result<String> {
        if let Some(path) = &self.options.csv {
            self.write_csv(path, &report).await?;
        }

        if self.options.json {
            let mut json = serde_json::to_string_pretty(&report)?;
            json.push('\n');
            return Ok(json);
        }

        Ok(report.render(self.options.verbose))
    }
}
