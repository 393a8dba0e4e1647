pub mod alunos;
pub mod auth;
pub mod cursos;
pub mod matriculas;
pub mod profiles;
pub mod roles;
