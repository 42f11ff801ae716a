//! Reference LCA backend built on dense matrices.
//!
//! The technosphere matrix `A` is square, one product row and one activity column
//! per database activity, both in database order. Production exchanges add to `A`,
//! technosphere inputs subtract from it, activities without a production exchange
//! produce one unit of their product. The score of a demand `f` is
//! `c · B · A⁻¹ f` with `B` the biosphere matrix and `c` the characterization
//! factors of the chosen method.

use crate::backend::{Demand, LcaBackend, LcaEvaluator};
use crate::error::EvaluatorError;
use crate::inventory::{ActivityKey, Database, ExchangeKind, Uncertainty};
use ahash::AHashMap;
use nalgebra::{DMatrix, DVector, Dyn, LU};
use rand::SeedableRng;
use rand::rngs::StdRng;

mod sampling;

use sampling::Sampler;

/// One exchange's contribution to a matrix cell: `sign * amount`.
#[derive(Debug, Clone)]
struct MatrixEntry {
    row: usize,
    col: usize,
    amount: f64,
    sign: f64,
    uncertainty: Option<Uncertainty>,
    input: ActivityKey,
    output: ActivityKey,
}

/// A matrix entry prepared for resampling.
#[derive(Debug, Clone)]
struct StochasticEntry {
    row: usize,
    col: usize,
    amount: f64,
    sign: f64,
    sampler: Option<Sampler>,
}

impl StochasticEntry {
    fn prepare(entry: &MatrixEntry) -> Result<Self, EvaluatorError> {
        let sampler = entry
            .uncertainty
            .as_ref()
            .map(|u| Sampler::new(entry.amount, u, &entry.input, &entry.output))
            .transpose()?;
        Ok(Self {
            row: entry.row,
            col: entry.col,
            amount: entry.amount,
            sign: entry.sign,
            sampler,
        })
    }

    fn draw(&self, rng: &mut StdRng) -> f64 {
        let amount = match &self.sampler {
            Some(sampler) => sampler.sample(rng),
            None => self.amount,
        };
        self.sign * amount
    }
}

/// Builds `MatrixEvaluator`s from an in-memory `Database`.
#[derive(Debug, Clone)]
pub struct MatrixLca {
    activities: AHashMap<ActivityKey, usize>,
    flows: AHashMap<ActivityKey, usize>,
    technosphere: Vec<MatrixEntry>,
    biosphere: Vec<MatrixEntry>,
    /// Columns that get the implicit unit production on the diagonal.
    implicit_production: Vec<usize>,
    methods: AHashMap<String, AHashMap<ActivityKey, f64>>,
    seed: Option<u64>,
}

impl MatrixLca {
    pub fn new(database: &Database) -> Self {
        let activities: AHashMap<ActivityKey, usize> = database
            .activities()
            .enumerate()
            .map(|(position, activity)| (activity.key.clone(), position))
            .collect();

        let mut flows: AHashMap<ActivityKey, usize> = AHashMap::new();
        let mut technosphere = Vec::new();
        let mut biosphere = Vec::new();
        let mut implicit_production = Vec::new();

        for (position, activity) in database.activities().enumerate() {
            let mut produces = false;
            for exchange in &activity.exchanges {
                let output = exchange
                    .output
                    .clone()
                    .unwrap_or_else(|| activity.key.clone());
                let col = activities.get(&output).copied().unwrap_or(position);
                let entry = |row: usize, sign: f64| MatrixEntry {
                    row,
                    col,
                    amount: exchange.amount,
                    sign,
                    uncertainty: exchange.uncertainty.clone(),
                    input: exchange.input.clone(),
                    output: output.clone(),
                };

                match exchange.kind {
                    ExchangeKind::Biosphere => {
                        let next = flows.len();
                        let row = *flows.entry(exchange.input.clone()).or_insert(next);
                        biosphere.push(entry(row, 1.0));
                    }
                    // `Database::new` guarantees technosphere inputs resolve.
                    ExchangeKind::Production => {
                        if let Some(&row) = activities.get(&exchange.input) {
                            produces = true;
                            technosphere.push(entry(row, 1.0));
                        }
                    }
                    ExchangeKind::Technosphere => {
                        if let Some(&row) = activities.get(&exchange.input) {
                            technosphere.push(entry(row, -1.0));
                        }
                    }
                }
            }
            if !produces {
                implicit_production.push(position);
            }
        }

        let methods = database
            .methods()
            .map(|method| (method.name.clone(), method.factors.clone()))
            .collect();

        log::debug!(
            "Assembled {}x{} technosphere with {} elementary flows",
            activities.len(),
            activities.len(),
            flows.len()
        );

        Self {
            activities,
            flows,
            technosphere,
            biosphere,
            implicit_production,
            methods,
            seed: None,
        }
    }

    /// Fixes the seed of the random generator used by stochastic evaluators.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Registers (or replaces) an impact assessment method.
    pub fn with_method(mut self, name: &str, factors: AHashMap<ActivityKey, f64>) -> Self {
        self.methods.insert(name.to_string(), factors);
        self
    }

    pub fn dimension(&self) -> usize {
        self.activities.len()
    }
}

impl LcaBackend for MatrixLca {
    type Evaluator = MatrixEvaluator;

    fn evaluator(
        &self,
        demand: Demand,
        method: &str,
        use_distributions: bool,
    ) -> Result<MatrixEvaluator, EvaluatorError> {
        let factors = self
            .methods
            .get(method)
            .ok_or_else(|| EvaluatorError::UnknownMethod(method.to_string()))?;

        let mut characterization = DVector::zeros(self.flows.len());
        for (flow, &row) in &self.flows {
            if let Some(&factor) = factors.get(flow) {
                characterization[row] = factor;
            }
        }

        let stochastic = if use_distributions {
            let prepare = |entries: &[MatrixEntry]| {
                entries
                    .iter()
                    .map(StochasticEntry::prepare)
                    .collect::<Result<Vec<_>, _>>()
            };
            let rng = match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            Some(Stochastic {
                technosphere: prepare(&self.technosphere)?,
                biosphere: prepare(&self.biosphere)?,
                rng,
            })
        } else {
            None
        };

        let dimension = self.dimension();
        let mut evaluator = MatrixEvaluator {
            activities: self.activities.clone(),
            technosphere: DMatrix::zeros(dimension, dimension),
            biosphere: DMatrix::zeros(self.flows.len(), dimension),
            implicit_production: self.implicit_production.clone(),
            characterization,
            demand: DVector::zeros(dimension),
            lu: None,
            supply: None,
            score: f64::NAN,
            stochastic,
        };
        evaluator.fill(
            self.technosphere.iter().map(|e| (e.row, e.col, e.sign * e.amount)),
            self.biosphere.iter().map(|e| (e.row, e.col, e.sign * e.amount)),
        );
        evaluator.demand = evaluator.demand_vector(&demand)?;
        Ok(evaluator)
    }
}

#[derive(Debug, Clone)]
struct Stochastic {
    technosphere: Vec<StochasticEntry>,
    biosphere: Vec<StochasticEntry>,
    rng: StdRng,
}

/// A solvable LCA problem over dense matrices.
///
/// The LU factorization of the technosphere matrix is cached, so `recompute`
/// for a new demand only costs a back substitution until the next draw.
#[derive(Debug, Clone)]
pub struct MatrixEvaluator {
    activities: AHashMap<ActivityKey, usize>,
    technosphere: DMatrix<f64>,
    biosphere: DMatrix<f64>,
    implicit_production: Vec<usize>,
    characterization: DVector<f64>,
    demand: DVector<f64>,
    lu: Option<LU<f64, Dyn, Dyn>>,
    supply: Option<DVector<f64>>,
    score: f64,
    stochastic: Option<Stochastic>,
}

impl MatrixEvaluator {
    fn fill(
        &mut self,
        technosphere: impl Iterator<Item = (usize, usize, f64)>,
        biosphere: impl Iterator<Item = (usize, usize, f64)>,
    ) {
        self.technosphere.fill(0.0);
        self.biosphere.fill(0.0);
        for &col in &self.implicit_production {
            self.technosphere[(col, col)] = 1.0;
        }
        for (row, col, value) in technosphere {
            self.technosphere[(row, col)] += value;
        }
        for (row, col, value) in biosphere {
            self.biosphere[(row, col)] += value;
        }
        self.lu = None;
    }

    /// Draws new amounts for every uncertain exchange.
    fn resample(&mut self) -> Result<(), EvaluatorError> {
        let mut stochastic = self.stochastic.take().ok_or(EvaluatorError::NotStochastic)?;
        let rng = &mut stochastic.rng;
        let technosphere: Vec<_> = stochastic
            .technosphere
            .iter()
            .map(|e| (e.row, e.col, e.draw(rng)))
            .collect();
        let biosphere: Vec<_> = stochastic
            .biosphere
            .iter()
            .map(|e| (e.row, e.col, e.draw(rng)))
            .collect();
        self.fill(technosphere.into_iter(), biosphere.into_iter());
        self.stochastic = Some(stochastic);
        Ok(())
    }

    fn demand_vector(&self, demand: &Demand) -> Result<DVector<f64>, EvaluatorError> {
        let mut vector = DVector::zeros(self.technosphere.nrows());
        for (key, &amount) in demand {
            let row = self
                .activities
                .get(key)
                .ok_or_else(|| EvaluatorError::NotInMatrix(key.clone()))?;
            vector[*row] += amount;
        }
        Ok(vector)
    }

    /// The supply vector of the last inventory calculation.
    pub fn supply(&self) -> Option<&DVector<f64>> {
        self.supply.as_ref()
    }
}

impl LcaEvaluator for MatrixEvaluator {
    fn compute_inventory(&mut self) -> Result<(), EvaluatorError> {
        let lu = self
            .lu
            .get_or_insert_with(|| self.technosphere.clone().lu());
        let supply = lu
            .solve(&self.demand)
            .ok_or(EvaluatorError::SingularMatrix)?;
        self.supply = Some(supply);
        Ok(())
    }

    fn compute_impact(&mut self) -> Result<(), EvaluatorError> {
        let supply = self.supply.as_ref().ok_or(EvaluatorError::NotComputed)?;
        let inventory = &self.biosphere * supply;
        self.score = self.characterization.dot(&inventory);
        Ok(())
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn recompute(&mut self, demand: &Demand) -> Result<(), EvaluatorError> {
        self.demand = self.demand_vector(demand)?;
        self.compute_inventory()?;
        self.compute_impact()
    }

    fn next_sample(&mut self) -> Result<f64, EvaluatorError> {
        self.resample()?;
        self.compute_inventory()?;
        self.compute_impact()?;
        Ok(self.score)
    }

    fn technosphere_coefficient(
        &self,
        product: &ActivityKey,
        activity: &ActivityKey,
    ) -> Result<f64, EvaluatorError> {
        let row = self
            .activities
            .get(product)
            .ok_or_else(|| EvaluatorError::NotInMatrix(product.clone()))?;
        let col = self
            .activities
            .get(activity)
            .ok_or_else(|| EvaluatorError::NotInMatrix(activity.clone()))?;
        Ok(self.technosphere[(*row, *col)])
    }
}
