//! Named (non-nameless) surface syntax. This is the "concrete tree" the
//! external parser is contracted to produce (§4.2 of the design); this crate
//! never parses text itself — lexical conventions and grammar are explicitly
//! out of scope.

/// A named term, exactly as a parser would hand it to
/// [`crate::builder::build_term`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceTerm {
    Var(String),
    Abs(String, Option<SurfaceType>, Box<SurfaceTerm>),
    App(Box<SurfaceTerm>, Box<SurfaceTerm>),
    If(Box<SurfaceTerm>, Box<SurfaceTerm>, Box<SurfaceTerm>),
    Let(String, Box<SurfaceTerm>, Box<SurfaceTerm>),
    Tuple(Vec<SurfaceTerm>),
    Record(Vec<(String, SurfaceTerm)>),
    Proj(Box<SurfaceTerm>, String),
    True,
    False,
    /// Numeric literal; the builder expands `n` into `Succ^n(Zero)`.
    Num(u64),
    Succ(Box<SurfaceTerm>),
    Pred(Box<SurfaceTerm>),
    IsZero(Box<SurfaceTerm>),
    TypeAbs(String, Box<SurfaceTerm>),
    TypeApp(Box<SurfaceTerm>, SurfaceType),
    ExisPack(SurfaceType, Box<SurfaceTerm>, SurfaceType),
    ExisUnpack(String, String, Box<SurfaceTerm>, Box<SurfaceTerm>),
}

/// A named type.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceType {
    Bool,
    Nat,
    Top,
    Bot,
    Arrow(Box<SurfaceType>, Box<SurfaceType>),
    Record(Vec<(String, SurfaceType)>),
    Tuple(Vec<SurfaceType>),
    /// Either a bound type variable (level 6, resolved against context) or a
    /// free type name (level 5); the builder disambiguates by lookup.
    Ident(String),
    Univ(String, Box<SurfaceType>),
    Exis(String, Box<SurfaceType>),
}

/// A single `;`-terminated top-level command (§6).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `name : Type` — declares a free variable.
    Bind(String, SurfaceType),
    /// A term to be evaluated or type-checked, depending on the interpreter's
    /// mode.
    Term(SurfaceTerm),
}
