// Built-in skill taxonomy used when no catalog file is available.
// Category order here is the declaration order extraction and recommendations follow.

pub const TECHNICAL_SKILLS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "angular",
    "vue",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "gcp",
    "machine learning",
    "deep learning",
    "tensorflow",
    "pytorch",
    "sql",
    "postgresql",
    "mysql",
    "mongodb",
    "redis",
    "git",
    "jenkins",
];

pub const SOFT_SKILLS: &[&str] = &[
    "communication",
    "leadership",
    "teamwork",
    "problem solving",
    "analytical thinking",
    "creativity",
    "adaptability",
    "time management",
    "project management",
];

pub const DOMAINS: &[&str] = &[
    "finance",
    "healthcare",
    "e-commerce",
    "education",
    "manufacturing",
    "retail",
    "telecommunications",
];

pub const METHODOLOGIES: &[&str] = &[
    "agile",
    "scrum",
    "kanban",
    "waterfall",
    "devops",
    "ci/cd",
    "tdd",
    "bdd",
    "microservices",
];

pub const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    ("technical_skills", TECHNICAL_SKILLS),
    ("soft_skills", SOFT_SKILLS),
    ("domains", DOMAINS),
    ("methodologies", METHODOLOGIES),
];
