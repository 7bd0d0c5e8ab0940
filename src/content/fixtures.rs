//! Sample content shared by unit tests

use chrono::{TimeZone, Utc};

use super::{Catalog, Category, CategoryKind, ChangeFreq, Difficulty, Page, Tool, Tutorial};
use crate::markdown::MarkdownRenderer;

pub fn category(id: &str, name: &str, slug: &str, icon: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{} tools and guides", name),
        icon: icon.to_string(),
        slug: slug.to_string(),
        kind: CategoryKind::Both,
        color: None,
    }
}

pub fn categories() -> Vec<Category> {
    vec![
        category("development", "Development", "development", "💻"),
        category("design", "Design", "design", "🎨"),
        category("productivity", "Productivity", "productivity", "⚡"),
        category("ai", "AI", "ai-tools", "🤖"),
    ]
}

pub fn tool(id: &str, category: &str) -> Tool {
    Tool {
        id: id.to_string(),
        title: id.to_string(),
        description: format!("About {}", id),
        category: category.to_string(),
        sub_category: None,
        tags: Vec::new(),
        url: format!("https://{}.example.com", id),
        image_url: None,
        rating: None,
        is_free: false,
        featured: false,
        slug: String::new(),
        published_at: None,
        detailed_content: None,
    }
}

pub fn tools() -> Vec<Tool> {
    let mut vscode = tool("vscode", "development");
    vscode.title = "Visual Studio Code".into();
    vscode.description = "Lightweight code editor".into();
    vscode.tags = vec!["editor".into(), "ide".into()];
    vscode.rating = Some(4.8);
    vscode.is_free = true;
    vscode.featured = true;
    vscode.published_at = Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
    vscode.detailed_content = Some("## Features\n\nFast & extensible.\n".into());

    let mut figma = tool("figma", "design");
    figma.title = "Figma".into();
    figma.description = "Collaborative interface design tool".into();
    figma.tags = vec!["ui".into(), "prototyping".into()];
    figma.is_free = true;
    figma.featured = true;
    figma.published_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());

    let mut notion = tool("notion", "productivity");
    notion.title = "Notion".into();
    notion.description = "Notes and wikis in one workspace".into();
    notion.tags = vec!["notes".into(), "wiki".into()];

    let mut chatgpt = tool("chatgpt", "ai");
    chatgpt.title = "ChatGPT".into();
    chatgpt.description = "Conversational assistant".into();
    chatgpt.tags = vec!["llm".into(), "chat".into()];
    chatgpt.is_free = true;
    chatgpt.published_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());

    // File order deliberately differs from date order
    vec![vscode, figma, notion, chatgpt]
}

pub fn tutorial(slug: &str, category: &str) -> Tutorial {
    Tutorial {
        id: slug.to_string(),
        title: slug.to_string(),
        description: format!("Learn {}", slug),
        content: format!("# {}\n\nBody.\n", slug),
        category: category.to_string(),
        tags: Vec::new(),
        author: "MatrixTools Team".to_string(),
        published_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        updated_at: None,
        read_time: 1,
        difficulty: None,
        featured: false,
        slug: slug.to_string(),
        related_tools: Vec::new(),
        prerequisites: Vec::new(),
    }
}

pub fn tutorials() -> Vec<Tutorial> {
    let mut git = tutorial("git-basics", "development");
    git.title = "Git Basics".into();
    git.description = "Version control from the first commit".into();
    git.tags = vec!["git".into()];
    git.difficulty = Some(Difficulty::Beginner);
    git.published_at = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
    git.content = "# Git Basics\n\n## Setup\n\nInstall git.\n\n## Setup\n\nConfigure it.\n".into();

    let mut docker = tutorial("docker-intro", "development");
    docker.title = "Docker 入门".into();
    docker.description = "Run your first container".into();
    docker.tags = vec!["docker".into(), "devops".into()];
    docker.difficulty = Some(Difficulty::Intermediate);
    docker.published_at = Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap();
    docker.related_tools = vec!["vscode".into()];
    docker.content = "# Docker 入门\n\n## 安装\n\n```bash\ndocker run hello-world\n```\n\n| Command | Purpose |\n|---|---|\n| `ps` | list |\n".into();

    let mut prompts = tutorial("prompt-basics", "ai-tools");
    prompts.title = "Prompt Basics".into();
    prompts.description = "Write better prompts".into();
    prompts.tags = vec!["llm".into()];
    prompts.difficulty = Some(Difficulty::Beginner);
    prompts.featured = true;
    prompts.published_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    vec![git, docker, prompts]
}

pub fn page(slug: &str, title: &str) -> Page {
    Page {
        slug: slug.to_string(),
        title: title.to_string(),
        description: format!("{} page", title),
        content: format!("# {}\n\nBody.\n", title),
        updated_at: None,
        priority: 0.5,
        changefreq: ChangeFreq::Yearly,
    }
}

pub fn pages() -> Vec<Page> {
    let mut about = page("about", "关于我们");
    about.description = "了解我们的使命".into();
    about.content = "# 关于我们\n\n## 我们的使命\n\nCurated tools & guides.\n".into();
    about.priority = 0.8;
    about.changefreq = ChangeFreq::Monthly;

    let mut privacy = page("privacy", "隐私政策");
    privacy.updated_at = Some(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());

    vec![about, privacy]
}

pub fn catalog() -> Catalog {
    Catalog::new(
        categories(),
        tools(),
        tutorials(),
        pages(),
        &MarkdownRenderer::new().unwrap(),
    )
    .unwrap()
}
