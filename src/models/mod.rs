pub mod aluno;
pub mod auth;
pub mod curso;
pub mod matricula;
pub mod profile;
pub mod user;
