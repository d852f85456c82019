use crate::domain::model::RunOutcome;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<RunOutcome> {
        println!("Starting payroll normalization...");

        println!("Extracting data...");
        let data = self.pipeline.extract()?;
        println!(
            "Loaded {} roster employees and {} pay rows",
            data.roster.records.len(),
            data.raw.len()
        );

        println!("Matching and mapping...");
        let result = self.pipeline.transform(data)?;
        println!(
            "Prepared {} output rows ({} dropped, {} appended, {} ambiguous)",
            result.records.len(),
            result.dropped,
            result.appended,
            result.ambiguous
        );

        self.pipeline.load(result)
    }
}
