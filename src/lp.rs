//! Forme MILP indépendante du solveur : variables, contraintes linéaires
//! étiquetées et objectif à minimiser.
//!
//! C'est l'objet transmis tel quel à un [`crate::solver::SolverBackend`].

use crate::scheduler::ConstraintKind;

/// Index d'une variable dans un [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarKind {
    Binary,
    Continuous { lower: f64, upper: Option<f64> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDef {
    pub name: String,
    pub kind: VarKind,
}

/// Somme `Σ coef·var` (les constantes vont dans le second membre).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Somme de variables à coefficient 1.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
        }
    }

    pub fn term(mut self, var: VarId, coef: f64) -> Self {
        self.terms.push((var, coef));
        self
    }

    pub fn eval(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values.get(v.index()).copied().unwrap_or(0.0))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    Le,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub expr: LinearExpr,
    pub cmp: Cmp,
    pub rhs: f64,
}

impl Constraint {
    pub fn is_satisfied(&self, values: &[f64], eps: f64) -> bool {
        let lhs = self.expr.eval(values);
        match self.cmp {
            Cmp::Eq => (lhs - self.rhs).abs() <= eps,
            Cmp::Le => lhs <= self.rhs + eps,
            Cmp::Ge => lhs + eps >= self.rhs,
        }
    }
}

/// Problème de minimisation complet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    vars: Vec<VarDef>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_var<N: Into<String>>(&mut self, name: N, kind: VarKind) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push(VarDef {
            name: name.into(),
            kind,
        });
        id
    }

    pub fn add_constraint(&mut self, kind: ConstraintKind, expr: LinearExpr, cmp: Cmp, rhs: f64) {
        self.constraints.push(Constraint {
            kind,
            expr,
            cmp,
            rhs,
        });
    }

    pub fn minimise(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn vars(&self) -> &[VarDef] {
        &self.vars
    }
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Contraintes non satisfaites par `values` (tolérance `eps`).
    pub fn unsatisfied<'a>(
        &'a self,
        values: &'a [f64],
        eps: f64,
    ) -> impl Iterator<Item = &'a Constraint> {
        self.constraints
            .iter()
            .filter(move |c| !c.is_satisfied(values, eps))
    }
}
