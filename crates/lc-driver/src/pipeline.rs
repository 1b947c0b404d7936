//! Thin driver (§4.8): processes a sequence of commands against one shared
//! context. `Bind` extends the context; a term command evaluates or
//! type-checks/reconstructs depending on the pipeline's [`Mode`]. Errors in
//! one command never poison later ones — the only context mutation a
//! command performs is `Bind`, and that happens only after its type has
//! been built successfully, so a failed bind never installs a binding.

use log::debug;

use lc_ast::{Context, FreshVarGen, Term, Type};
use lc_surface::{build_command, BuiltCommand, Command};
use lc_typecheck::Level;

use crate::error::DriverError;

/// Which of the six calculi this pipeline instance runs. Only
/// [`Calculus::SimpleBool`], [`Calculus::FullSimple`] and [`Calculus::FullFSub`]
/// have a syntax-directed checker; only [`Calculus::FullRecon`] has a
/// reconstructor. Every level shares the same evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calculus {
    /// Level 1: arithmetic expressions over booleans and naturals.
    Arith,
    /// Level 2: untyped lambda calculus.
    Untyped,
    /// Level 3: simply typed lambda calculus with booleans.
    SimpleBool,
    /// Level 4: records with subtyping, Top/Bot.
    FullSimple,
    /// Level 5: Hindley-Milner reconstruction with let-polymorphism.
    FullRecon,
    /// Level 6: System F with existentials.
    FullFSub,
}

/// Whether a term command is evaluated to normal form or typed (§6: "a term
/// — to be evaluated or type-checked depending on the mode flag").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Eval,
    Check,
}

/// The result of processing one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A `Bind` command installed this name in the context.
    Bound(String),
    /// A term command reduced to this normal form (`Mode::Eval`).
    Evaluated(Term),
    /// A term command synthesized this type (`Mode::Check`, levels 3/4/6).
    Checked(Type),
    /// A term command reconstructed this principal type (`Mode::Check`, level 5).
    Reconstructed(Type),
}

/// Owns the shared [`Context`] and, for level 5, the fresh-variable counter,
/// across a run of commands.
pub struct Pipeline {
    calculus: Calculus,
    mode: Mode,
    ctx: Context,
    gen: FreshVarGen,
}

impl Pipeline {
    pub fn new(calculus: Calculus, mode: Mode) -> Self {
        Self { calculus, mode, ctx: Context::new(), gen: FreshVarGen::new() }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Process one command, mutating the shared context for `Bind`.
    pub fn process(&mut self, cmd: &Command) -> Result<Outcome, DriverError> {
        match build_command(&mut self.ctx, cmd)? {
            BuiltCommand::Bound(name) => Ok(Outcome::Bound(name)),
            BuiltCommand::Term(term) => match self.mode {
                Mode::Eval => Ok(Outcome::Evaluated(lc_eval::normalize(&term)?)),
                Mode::Check => self.check_term(&term),
            },
        }
    }

    fn check_term(&mut self, term: &Term) -> Result<Outcome, DriverError> {
        match self.calculus {
            Calculus::Arith | Calculus::Untyped => Err(DriverError::NoChecker(self.calculus)),
            Calculus::SimpleBool => {
                Ok(Outcome::Checked(lc_typecheck::typeof_term(&mut self.ctx, Level::Simple, term)?))
            }
            Calculus::FullSimple => {
                Ok(Outcome::Checked(lc_typecheck::typeof_term(&mut self.ctx, Level::Sub, term)?))
            }
            Calculus::FullFSub => {
                Ok(Outcome::Checked(lc_typecheck::typeof_term(&mut self.ctx, Level::Simple, term)?))
            }
            Calculus::FullRecon => {
                Ok(Outcome::Reconstructed(lc_infer::reconstruct(&mut self.ctx, &mut self.gen, term)?))
            }
        }
    }

    /// Process a sequence of commands, collecting one result per command. A
    /// command that errors does not stop the run; later commands still see
    /// whatever context mutations earlier successful commands made.
    pub fn run(&mut self, cmds: &[Command]) -> Vec<Result<Outcome, DriverError>> {
        cmds.iter()
            .map(|cmd| {
                let result = self.process(cmd);
                match &result {
                    Ok(outcome) => debug!("command processed: {outcome:?}"),
                    Err(err) => debug!("command failed, continuing with next: {err}"),
                }
                result
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc_surface::{Command, SurfaceTerm, SurfaceType};

    #[test]
    fn arith_evaluates_without_a_checker() {
        let mut pipeline = Pipeline::new(Calculus::Arith, Mode::Eval);
        let cmd = Command::Term(SurfaceTerm::IsZero(Box::new(SurfaceTerm::Pred(Box::new(
            SurfaceTerm::Succ(Box::new(SurfaceTerm::Succ(Box::new(SurfaceTerm::Num(0))))),
        )))));
        let outcome = pipeline.process(&cmd).unwrap();
        assert!(matches!(outcome, Outcome::Evaluated(Term::False)));
    }

    #[test]
    fn arith_check_mode_has_no_checker() {
        let mut pipeline = Pipeline::new(Calculus::Arith, Mode::Check);
        let cmd = Command::Term(SurfaceTerm::True);
        assert!(matches!(pipeline.process(&cmd), Err(DriverError::NoChecker(Calculus::Arith))));
    }

    #[test]
    fn unannotated_lambda_is_rejected_under_full_f_sub_too() {
        // The builder is level-agnostic, so `lambda x. true` builds fine even
        // when the target calculus is checked; the checker must still reject
        // it rather than quietly treating the missing annotation as `Top`.
        let mut pipeline = Pipeline::new(Calculus::FullFSub, Mode::Check);
        let cmd = Command::Term(SurfaceTerm::Abs(
            "x".into(),
            None,
            Box::new(SurfaceTerm::True),
        ));
        assert!(matches!(
            pipeline.process(&cmd),
            Err(DriverError::Check(lc_typecheck::TypeError::MissingAnnotation(name))) if name == "x"
        ));
    }

    #[test]
    fn failed_bind_does_not_poison_the_context() {
        let mut pipeline = Pipeline::new(Calculus::SimpleBool, Mode::Check);
        // `Y` is an unresolved free type name rather than a parse failure, so
        // this actually succeeds at the builder level (Type::Id); use an
        // unbound term reference instead to exercise a failing, non-binding
        // command that must not affect later lookups.
        let bad = Command::Term(SurfaceTerm::Var("nope".into()));
        assert!(pipeline.process(&bad).is_err());
        assert_eq!(pipeline.context().len(), 0);

        let bind = Command::Bind("x".into(), SurfaceType::Bool);
        let outcome = pipeline.process(&bind).unwrap();
        assert!(matches!(outcome, Outcome::Bound(name) if name == "x"));
        assert_eq!(pipeline.context().len(), 1);
    }

    #[test]
    fn simple_bool_checks_identity() {
        let mut pipeline = Pipeline::new(Calculus::SimpleBool, Mode::Check);
        let cmd = Command::Term(SurfaceTerm::Abs(
            "x".into(),
            Some(SurfaceType::Bool),
            Box::new(SurfaceTerm::Var("x".into())),
        ));
        let outcome = pipeline.process(&cmd).unwrap();
        assert_eq!(outcome, Outcome::Checked(Type::arrow(Type::Bool, Type::Bool)));
    }

    #[test]
    fn full_recon_reconstructs_a_polymorphic_let() {
        let mut pipeline = Pipeline::new(Calculus::FullRecon, Mode::Check);
        let inner_id = SurfaceTerm::Abs("z".into(), None, Box::new(SurfaceTerm::Var("z".into())));
        let cmd = Command::Term(SurfaceTerm::Abs(
            "x".into(),
            None,
            Box::new(SurfaceTerm::Let(
                "y".into(),
                Box::new(inner_id),
                Box::new(SurfaceTerm::App(
                    Box::new(SurfaceTerm::Var("y".into())),
                    Box::new(SurfaceTerm::Var("x".into())),
                )),
            )),
        ));
        let outcome = pipeline.process(&cmd).unwrap();
        match outcome {
            Outcome::Reconstructed(ty) => {
                let (param, ret) = ty.as_arrow().unwrap();
                assert_eq!(param, ret);
            }
            other => panic!("expected Reconstructed, got {other:?}"),
        }
    }

    #[test]
    fn system_f_type_application_evaluates_and_checks() {
        // (lambda X. lambda x:X. x) [Nat] 0
        let term = SurfaceTerm::App(
            Box::new(SurfaceTerm::TypeApp(
                Box::new(SurfaceTerm::TypeAbs(
                    "X".into(),
                    Box::new(SurfaceTerm::Abs(
                        "x".into(),
                        Some(SurfaceType::Ident("X".into())),
                        Box::new(SurfaceTerm::Var("x".into())),
                    )),
                )),
                SurfaceType::Nat,
            )),
            Box::new(SurfaceTerm::Num(0)),
        );

        let mut eval_pipeline = Pipeline::new(Calculus::FullFSub, Mode::Eval);
        let evaluated = eval_pipeline.process(&Command::Term(term.clone())).unwrap();
        assert!(matches!(evaluated, Outcome::Evaluated(Term::Zero)));

        let mut check_pipeline = Pipeline::new(Calculus::FullFSub, Mode::Check);
        let checked = check_pipeline.process(&Command::Term(term)).unwrap();
        assert_eq!(checked, Outcome::Checked(Type::Nat));
    }
}
