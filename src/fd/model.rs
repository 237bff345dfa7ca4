use super::domain::Domain;
use super::propagate::Propagate;
use super::propagator::{
    Absolute, AllDifferent, Among, Arithmetic, AtMostNValues, BinPacking, CountValue, Cumulative,
    Dfa, Element, IfThen, IneqOp, Inequality, IntervalArithmetic, IntervalOp, LinearSum, MaxOf,
    MinOf, Regular, Reified, Reify, Scale, ScaledDivision, Table,
};
use super::state::{SolverState, VarId};
use crate::error::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// Variable selection heuristics for search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Heuristic {
    /// Minimal `domain-size / (1 + degree)`.
    DomDeg,
    /// Minimal remaining values.
    Mrv,
    /// Minimal `domain-size / (1 + observed impact)`.
    Impact,
}

/// Value orderings; all deterministic given their seed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueOrder {
    Ascending,
    /// Prefer values most likely to improve the incumbent when optimizing;
    /// ascending otherwise.
    ObjImproving,
    Random(u64),
}

#[derive(Clone, Debug)]
pub struct SolverConfig {
    pub heuristic: Heuristic,
    pub value_order: ValueOrder,
    pub parallel_workers: usize,
    /// 0 = unlimited.
    pub node_limit: u64,
    pub time_limit: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            heuristic: Heuristic::DomDeg,
            value_order: ValueOrder::Ascending,
            parallel_workers: 1,
            node_limit: 0,
            time_limit: None,
        }
    }
}

/// A named finite-domain variable with its initial domain.
#[derive(Clone, Debug)]
pub struct IntVar {
    pub id: VarId,
    pub name: String,
    pub domain: Domain,
}

/// A constraint model: variables, posted propagators, and solver
/// configuration. Immutable during solving; built before.
///
/// All domains live in `1..=max_domain_size`; callers encode zero and
/// negative integers with an offset, and booleans as 1=false, 2=true.
/// Composite constraints (circuit, stretch, rational sums) post auxiliary
/// variables and primitive propagators here; they carry no propagator of
/// their own.
#[derive(Clone, Debug)]
pub struct Model {
    max_domain: usize,
    vars: Vec<IntVar>,
    propagators: Vec<Arc<dyn Propagate>>,
    config: SolverConfig,
}

impl Model {
    pub fn new(max_domain_size: usize) -> Model {
        Model {
            max_domain: max_domain_size,
            vars: vec![],
            propagators: vec![],
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Model {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SolverConfig {
        &mut self.config
    }

    pub fn max_domain_size(&self) -> usize {
        self.max_domain
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    pub fn var(&self, id: VarId) -> &IntVar {
        &self.vars[id as usize]
    }

    pub(crate) fn propagators(&self) -> &[Arc<dyn Propagate>] {
        &self.propagators
    }

    /// The number of posted propagators mentioning each variable, the
    /// "degree" of the dom/deg heuristic.
    pub(crate) fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.vars.len()];
        for p in &self.propagators {
            for v in p.variables() {
                degrees[v as usize] += 1;
            }
        }
        degrees
    }

    pub fn initial_state(&self) -> SolverState {
        SolverState::new(self.vars.iter().map(|v| Arc::new(v.domain.clone())).collect())
    }

    fn add_var(&mut self, domain: Domain, name: &str) -> VarId {
        let id = self.vars.len() as VarId;
        self.vars.push(IntVar {
            id,
            name: name.to_string(),
            domain,
        });
        id
    }

    pub fn int_var(&mut self, lo: isize, hi: isize, name: &str) -> Result<VarId> {
        let domain = Domain::range(self.max_domain, lo, hi)?;
        Ok(self.add_var(domain, name))
    }

    pub fn int_var_values(&mut self, values: &[isize], name: &str) -> Result<VarId> {
        if values.is_empty() {
            return Err(Error::InvalidArgument(format!("no values for {}", name)));
        }
        let domain = Domain::from_values(self.max_domain, values)?;
        Ok(self.add_var(domain, name))
    }

    /// A boolean variable over `{1, 2}` (1=false, 2=true).
    pub fn bool_var(&mut self, name: &str) -> Result<VarId> {
        self.int_var(1, 2, name)
    }

    /// Intersects a variable's initial domain; the way composites pin
    /// auxiliary variables.
    pub fn restrict(&mut self, v: VarId, domain: &Domain) -> Result<()> {
        self.check_var(v)?;
        let next = self.vars[v as usize].domain.intersect(domain);
        if next.is_empty() {
            return Err(Error::DomainEmpty { variable: v });
        }
        self.vars[v as usize].domain = next;
        Ok(())
    }

    pub fn post(&mut self, p: Arc<dyn Propagate>) {
        self.propagators.push(p);
    }

    fn check_var(&self, v: VarId) -> Result<()> {
        if (v as usize) < self.vars.len() {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!("unknown variable {}", v)))
        }
    }

    fn check_vars(&self, vars: &[VarId]) -> Result<()> {
        for &v in vars {
            self.check_var(v)?;
        }
        if vars.is_empty() {
            return Err(Error::InvalidArgument("empty variable list".into()));
        }
        Ok(())
    }

    pub fn all_different(&mut self, vars: &[VarId]) -> Result<()> {
        self.check_vars(vars)?;
        self.post(Arc::new(AllDifferent::new(vars.to_vec())));
        Ok(())
    }

    /// `y = x + k`.
    pub fn arithmetic(&mut self, x: VarId, y: VarId, k: isize) -> Result<()> {
        self.check_vars(&[x, y])?;
        self.post(Arc::new(Arithmetic::new(x, y, k)));
        Ok(())
    }

    pub fn inequality(&mut self, x: VarId, op: IneqOp, y: VarId) -> Result<()> {
        self.check_vars(&[x, y])?;
        self.post(Arc::new(Inequality::new(x, op, y)));
        Ok(())
    }

    /// `Σ coeffs[i]·vars[i] = total`.
    pub fn linear_sum(&mut self, coeffs: &[isize], vars: &[VarId], total: VarId) -> Result<()> {
        self.check_vars(vars)?;
        self.check_var(total)?;
        if coeffs.len() != vars.len() {
            return Err(Error::InvalidArgument(
                "coefficient/variable arity mismatch".into(),
            ));
        }
        let mut terms: Vec<(isize, VarId)> =
            coeffs.iter().copied().zip(vars.iter().copied()).collect();
        terms.push((-1, total));
        self.post(Arc::new(LinearSum::new(terms, 0)));
        Ok(())
    }

    /// Boolean cardinality: `total` encodes the number of true variables
    /// with the count+1 offset (count k is stored as k + 1).
    pub fn bool_sum(&mut self, vars: &[VarId], total: VarId) -> Result<()> {
        self.check_vars(vars)?;
        self.check_var(total)?;
        // Σ xᵢ over 1/2-valued vars is count + n, and total = count + 1,
        // so Σ xᵢ − total = n − 1.
        let mut terms: Vec<(isize, VarId)> = vars.iter().map(|&v| (1, v)).collect();
        terms.push((-1, total));
        self.post(Arc::new(LinearSum::named(
            "bool_sum",
            terms,
            vars.len() as isize - 1,
        )));
        Ok(())
    }

    /// `Σ (numers[i]/denoms[i])·vars[i] = total` with rational coefficients,
    /// reduced to an integer sum by scaling with the LCM of the
    /// denominators. When the LCM exceeds 1 the scaled total goes through an
    /// auxiliary variable bound by the exact-multiples `Scale` constraint.
    pub fn rational_linear_sum(
        &mut self,
        numers: &[isize],
        denoms: &[isize],
        vars: &[VarId],
        total: VarId,
    ) -> Result<()> {
        self.check_vars(vars)?;
        self.check_var(total)?;
        if numers.len() != vars.len() || denoms.len() != vars.len() {
            return Err(Error::InvalidArgument(
                "coefficient/variable arity mismatch".into(),
            ));
        }
        if denoms.iter().any(|&d| d <= 0) {
            return Err(Error::InvalidArgument(
                "denominators must be positive".into(),
            ));
        }
        let lcm = denoms.iter().fold(1isize, |acc, &d| lcm(acc, d));
        let coeffs: Vec<isize> = numers
            .iter()
            .zip(denoms.iter())
            .map(|(&n, &d)| n * (lcm / d))
            .collect();
        if lcm == 1 {
            return self.linear_sum(&coeffs, vars, total);
        }
        let scaled_total = self.int_var(1, self.max_domain as isize, "rational_sum#scaled")?;
        self.scale(total, lcm, scaled_total)?;
        self.linear_sum(&coeffs, vars, scaled_total)
    }

    /// `array[index] = value` for a constant array (1-based index).
    pub fn element(&mut self, array: &[isize], index: VarId, value: VarId) -> Result<()> {
        self.check_vars(&[index, value])?;
        if array.is_empty() {
            return Err(Error::InvalidArgument("empty element array".into()));
        }
        self.post(Arc::new(Element::new(array.to_vec(), index, value)));
        Ok(())
    }

    pub fn table(&mut self, vars: &[VarId], rows: Vec<Vec<isize>>) -> Result<()> {
        self.check_vars(vars)?;
        if rows.iter().any(|r| r.len() != vars.len()) {
            return Err(Error::InvalidArgument("table row arity mismatch".into()));
        }
        self.post(Arc::new(Table::new(vars.to_vec(), rows)));
        Ok(())
    }

    pub fn regular(&mut self, vars: &[VarId], dfa: Dfa) -> Result<()> {
        self.check_vars(vars)?;
        self.post(Arc::new(Regular::new(vars.to_vec(), dfa)));
        Ok(())
    }

    /// Per-value run-length bounds along the sequence, by reduction to a
    /// Regular constraint over `(value, run-counter)` states. Each spec is
    /// `(value, min-len, max-len)`; the variables are restricted to the
    /// listed values.
    pub fn stretch(&mut self, vars: &[VarId], specs: &[(isize, usize, usize)]) -> Result<()> {
        self.check_vars(vars)?;
        if specs.is_empty() {
            return Err(Error::InvalidArgument("empty stretch spec".into()));
        }
        for &(value, min_len, max_len) in specs {
            if value < 1 || min_len == 0 || min_len > max_len {
                return Err(Error::InvalidArgument(format!(
                    "bad stretch spec for value {}",
                    value
                )));
            }
        }
        let values: Vec<isize> = specs.iter().map(|s| s.0).collect();
        let allowed = Domain::from_values(self.max_domain, &values)?;
        for &v in vars {
            self.restrict(v, &allowed)?;
        }
        let symbols = values.iter().copied().max().unwrap() as usize;
        self.regular(vars, Dfa::stretch(specs, symbols))
    }

    pub fn cumulative(
        &mut self,
        starts: &[VarId],
        durations: &[isize],
        demands: &[isize],
        capacity: isize,
    ) -> Result<()> {
        self.check_vars(starts)?;
        if durations.len() != starts.len() || demands.len() != starts.len() {
            return Err(Error::InvalidArgument("cumulative arity mismatch".into()));
        }
        if capacity < 0 || durations.iter().any(|&d| d < 0) || demands.iter().any(|&d| d < 0) {
            return Err(Error::InvalidArgument(
                "cumulative arguments must be non-negative".into(),
            ));
        }
        self.post(Arc::new(Cumulative::new(
            starts.to_vec(),
            durations.to_vec(),
            demands.to_vec(),
            capacity,
        )));
        Ok(())
    }

    /// Hamiltonian circuit over successor variables (`succ[i]` is the
    /// 1-based successor node of node i; `start` is a 0-based node index).
    ///
    /// Built from reified equality booleans, per-node boolean column sums,
    /// and position counters: each arc taken forces `pos[to] = pos[from]+1`,
    /// except the arc closing the cycle into `start`. Sub-tours then cannot
    /// assign consistent positions.
    pub fn circuit(&mut self, succ: &[VarId], start: usize) -> Result<()> {
        self.check_vars(succ)?;
        let n = succ.len();
        if start >= n {
            return Err(Error::InvalidArgument("circuit start out of range".into()));
        }
        if n as usize > self.max_domain {
            return Err(Error::InvalidArgument(
                "circuit larger than max domain size".into(),
            ));
        }
        let nodes = Domain::range(self.max_domain, 1, n as isize)?;
        for (i, &s) in succ.iter().enumerate() {
            self.restrict(s, &nodes)?;
            if n > 1 {
                self.restrict(s, &nodes.remove((i + 1) as isize))?;
            }
        }
        self.all_different(succ)?;

        // Position counters, 1 at the start node.
        let mut pos = Vec::with_capacity(n);
        for i in 0..n {
            pos.push(self.int_var(1, n as isize, &format!("circuit#pos{}", i))?);
        }
        self.restrict(pos[start], &Domain::singleton(self.max_domain, 1)?)?;
        self.all_different(&pos)?;

        let one_true = Domain::singleton(self.max_domain, 2)?;
        for j in 0..n {
            let mut column = Vec::with_capacity(n);
            for i in 0..n {
                if i == j && n > 1 {
                    continue;
                }
                let b = self.bool_var(&format!("circuit#b{}_{}", i, j))?;
                self.post(Arc::new(Reified::new(
                    Reify::EqConst(succ[i], (j + 1) as isize),
                    b,
                )));
                column.push(b);
                if j != start {
                    // Taking the arc orders the positions; the closing arc
                    // into the start node is exempt.
                    self.post(Arc::new(IfThen::new(b, Reify::Offset(pos[i], pos[j], 1))));
                }
            }
            // Exactly one predecessor per node.
            let count = self.int_var(1, self.max_domain as isize, &format!("circuit#in{}", j))?;
            self.restrict(count, &one_true)?;
            self.bool_sum(&column, count)?;
        }
        Ok(())
    }

    pub fn bin_packing(
        &mut self,
        item_bins: &[VarId],
        sizes: &[isize],
        capacities: &[isize],
    ) -> Result<()> {
        self.check_vars(item_bins)?;
        if sizes.len() != item_bins.len() {
            return Err(Error::InvalidArgument("bin packing arity mismatch".into()));
        }
        if sizes.iter().any(|&s| s < 0) || capacities.iter().any(|&c| c < 0) {
            return Err(Error::InvalidArgument(
                "bin packing arguments must be non-negative".into(),
            ));
        }
        self.post(Arc::new(BinPacking::new(
            item_bins.to_vec(),
            sizes.to_vec(),
            capacities.to_vec(),
        )));
        Ok(())
    }

    /// `result = min(vars)`.
    pub fn minimum(&mut self, vars: &[VarId], result: VarId) -> Result<()> {
        self.check_vars(vars)?;
        self.check_var(result)?;
        self.post(Arc::new(MinOf::new(vars.to_vec(), result)));
        Ok(())
    }

    /// `result = max(vars)`.
    pub fn maximum(&mut self, vars: &[VarId], result: VarId) -> Result<()> {
        self.check_vars(vars)?;
        self.check_var(result)?;
        self.post(Arc::new(MaxOf::new(vars.to_vec(), result)));
        Ok(())
    }

    /// `abs = |x − offset|`.
    pub fn absolute(&mut self, x: VarId, offset: isize, abs: VarId) -> Result<()> {
        self.check_vars(&[x, abs])?;
        self.post(Arc::new(Absolute::new(x, offset, abs)));
        Ok(())
    }

    pub fn interval(
        &mut self,
        x: VarId,
        lo: isize,
        hi: isize,
        op: IntervalOp,
        result: VarId,
    ) -> Result<()> {
        self.check_vars(&[x, result])?;
        if lo > hi {
            return Err(Error::InvalidArgument("empty interval".into()));
        }
        self.post(Arc::new(IntervalArithmetic::new(x, lo, hi, op, result)));
        Ok(())
    }

    /// `result = k·x` for `k ≥ 1`.
    pub fn scale(&mut self, x: VarId, k: isize, result: VarId) -> Result<()> {
        self.check_vars(&[x, result])?;
        if k < 1 {
            return Err(Error::InvalidArgument("scale factor must be >= 1".into()));
        }
        self.post(Arc::new(Scale::new(x, k, result)));
        Ok(())
    }

    /// `quotient = dividend div k` for `k ≥ 1`.
    pub fn scaled_division(&mut self, dividend: VarId, k: isize, quotient: VarId) -> Result<()> {
        self.check_vars(&[dividend, quotient])?;
        if k < 1 {
            return Err(Error::InvalidArgument("divisor must be >= 1".into()));
        }
        self.post(Arc::new(ScaledDivision::new(dividend, k, quotient)));
        Ok(())
    }

    /// `b ↔ sub` over a boolean variable.
    pub fn reified(&mut self, sub: Reify, b: VarId) -> Result<()> {
        self.check_var(b)?;
        self.post(Arc::new(Reified::new(sub, b)));
        Ok(())
    }

    /// Occurrences of `value`; `count` uses the count+1 encoding.
    pub fn count(&mut self, vars: &[VarId], value: isize, count: VarId) -> Result<()> {
        self.check_vars(vars)?;
        self.check_var(count)?;
        self.post(Arc::new(CountValue::new(vars.to_vec(), value, count)));
        Ok(())
    }

    /// Occurrences of any value in the set; `count` uses the count+1
    /// encoding.
    pub fn among(&mut self, vars: &[VarId], values: &[isize], count: VarId) -> Result<()> {
        self.check_vars(vars)?;
        self.check_var(count)?;
        if values.is_empty() {
            return Err(Error::InvalidArgument("empty among set".into()));
        }
        self.post(Arc::new(Among::new(
            vars.to_vec(),
            values.to_vec(),
            count,
        )));
        Ok(())
    }

    /// Number of distinct values taken (stored directly, count ≥ 1).
    pub fn nvalues(&mut self, vars: &[VarId], n: VarId) -> Result<()> {
        self.check_vars(vars)?;
        self.check_var(n)?;
        self.post(Arc::new(super::propagator::NValues::new(vars.to_vec(), n)));
        Ok(())
    }

    /// `nvalues` under another name.
    pub fn distinct_count(&mut self, vars: &[VarId], n: VarId) -> Result<()> {
        self.nvalues(vars, n)
    }

    pub fn at_most_nvalues(&mut self, vars: &[VarId], k: isize) -> Result<()> {
        self.check_vars(vars)?;
        if k < 1 {
            return Err(Error::InvalidArgument("nvalues bound must be >= 1".into()));
        }
        self.post(Arc::new(AtMostNValues::new(vars.to_vec(), k)));
        Ok(())
    }
}

fn gcd(a: isize, b: isize) -> isize {
    if b == 0 {
        a.abs()
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: isize, b: isize) -> isize {
    a / gcd(a, b) * b
}
