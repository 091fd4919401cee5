//! 러닝하이 管理端 CLI
//!
//! 每个子命令对应后台的一个页面操作：登录后 token 保存在本地 SQLite，
//! 之后的命令自动带上；结果以表格打印。

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use runninghigh_admin::admin::challenge::{ChallengeCategory, ChallengeImage, ChallengeStatus, NewChallenge};
use runninghigh_admin::admin::error::AdminError;
use runninghigh_admin::admin::faq::FaqDraft;
use runninghigh_admin::admin::feedback::ReplyFilter;
use runninghigh_admin::admin::listener::{ErrorReporter, NavigationListener, Route};
use runninghigh_admin::admin::member::{MemberFilter, MemberTab};
use runninghigh_admin::admin::pagination::PagedQuery;
use runninghigh_admin::admin::render::Table;
use runninghigh_admin::admin::report::{report_status_label, ReportDetail, ReportKind, ReportStatus};
use runninghigh_admin::admin::DEFAULT_PAGE_SIZE;
use runninghigh_admin::{
    AdminClient, AdminConfig, AuthService, ChallengeView, FaqView, FeedbackView, MemberView,
    ReportView,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// 러닝하이 管理端 CLI
#[derive(Parser, Debug)]
#[command(name = "runninghigh-admin-cli")]
#[command(about = "러닝하이 管理端 CLI - 会员、举报、挑战、反馈与 FAQ 管理", long_about = None)]
struct Args {
    /// REST API 基础地址
    #[arg(long, env = "RUNNINGHIGH_API_BASE_URL", default_value = "http://localhost:8080")]
    api_base_url: String,

    /// 会话 token 数据库
    #[arg(
        long,
        env = "RUNNINGHIGH_SESSION_DB",
        default_value = "sqlite://runninghigh-admin.db?mode=rwc"
    )]
    session_db: String,

    /// 每页条数
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// 日志级别（默认: warn,runninghigh_admin=info）
    #[arg(long, default_value = "warn,runninghigh_admin=info")]
    log_level: String,

    /// 日志文件（追加写入）
    #[arg(long, default_value = "runninghigh-admin.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 管理员登录
    Login {
        #[arg(short, long)]
        account: String,
        #[arg(short, long, env = "RUNNINGHIGH_ADMIN_PASSWORD")]
        password: String,
    },
    /// 管理员注册（需要邀请码）
    Signup {
        #[arg(short, long)]
        account: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        invite_code: String,
    },
    /// 登出并清空本地 token
    Logout,
    /// 校验本地会话
    Check,
    /// 会员列表
    Members {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// 只看黑名单
        #[arg(long)]
        blacklist: bool,
        /// 昵称 / 姓名关键字
        #[arg(long)]
        keyword: Option<String>,
    },
    /// 切换会员黑名单状态
    Blacklist {
        member_id: String,
        /// 会员所在页
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// 举报列表
    Reports {
        #[arg(value_enum, default_value_t = KindArg::Post)]
        kind: KindArg,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// 举报详情和同一对象的全部举报
    ReportDetail {
        #[arg(value_enum)]
        kind: KindArg,
        report_no: i64,
    },
    /// 处理举报
    ReportResolve {
        #[arg(value_enum)]
        kind: KindArg,
        /// 打开详情的举报编号
        report_no: i64,
        #[arg(value_enum)]
        status: StatusArg,
        /// 要处理的相关举报编号，缺省只处理 report_no
        #[arg(long, num_args = 1..)]
        select: Vec<i64>,
    },
    /// 挑战列表
    Challenges {
        #[arg(value_enum, default_value_t = ChallengeStatusArg::InProgress)]
        status: ChallengeStatusArg,
        /// 显示某个挑战的详情
        #[arg(long)]
        show: Option<i64>,
    },
    /// 新建挑战
    ChallengeCreate {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, value_enum, default_value_t = CategoryArg::Distance)]
        category: CategoryArg,
        #[arg(long)]
        goal: u32,
        #[arg(long)]
        goal_detail: String,
        #[arg(long)]
        start_date: String,
        #[arg(long)]
        end_date: String,
        /// 封面图片路径
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// 反馈列表
    Feedbacks {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, value_enum, default_value_t = ReplyFilterArg::All)]
        filter: ReplyFilterArg,
    },
    /// 回复反馈
    Reply {
        feedback_no: i64,
        content: String,
        /// 反馈所在页
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// FAQ 列表
    Faqs,
    /// 新建 FAQ
    FaqAdd { question: String, answer: String },
    /// 修改 FAQ，未给出的字段保持原值
    FaqEdit {
        faq_no: i64,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        answer: Option<String>,
    },
    /// 删除 FAQ
    FaqDelete { faq_no: i64 },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Post,
    Reply,
}

impl From<KindArg> for ReportKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Post => ReportKind::Post,
            KindArg::Reply => ReportKind::Reply,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg {
    Accepted,
    Rejected,
    InProgress,
}

impl From<StatusArg> for ReportStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Accepted => ReportStatus::Accepted,
            StatusArg::Rejected => ReportStatus::Rejected,
            StatusArg::InProgress => ReportStatus::InProgress,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChallengeStatusArg {
    Scheduled,
    InProgress,
    Completed,
}

impl From<ChallengeStatusArg> for ChallengeStatus {
    fn from(arg: ChallengeStatusArg) -> Self {
        match arg {
            ChallengeStatusArg::Scheduled => ChallengeStatus::Scheduled,
            ChallengeStatusArg::InProgress => ChallengeStatus::InProgress,
            ChallengeStatusArg::Completed => ChallengeStatus::Completed,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CategoryArg {
    Distance,
    Speed,
    Attendance,
}

impl From<CategoryArg> for ChallengeCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Distance => ChallengeCategory::Distance,
            CategoryArg::Speed => ChallengeCategory::Speed,
            CategoryArg::Attendance => ChallengeCategory::Attendance,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReplyFilterArg {
    All,
    Replied,
    Unreplied,
}

impl From<ReplyFilterArg> for ReplyFilter {
    fn from(arg: ReplyFilterArg) -> Self {
        match arg {
            ReplyFilterArg::All => ReplyFilter::All,
            ReplyFilterArg::Replied => ReplyFilter::Replied,
            ReplyFilterArg::Unreplied => ReplyFilter::Unreplied,
        }
    }
}

/// 初始化日志（同时输出到 stdout 和文件）
fn init_logger(log_level: &str, log_path: &Path) -> Result<()> {
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 优先使用环境变量 RUST_LOG，否则使用命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("无法创建日志文件 {}", log_path.display()))?;

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_target(false)
        .with_ansi(true);

    // 文件不需要颜色
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("[CLI] 📝 日志同时输出到控制台和文件: {}", log_path.display());
    Ok(())
}

struct CliNavigationListener;

#[async_trait::async_trait]
impl NavigationListener for CliNavigationListener {
    async fn on_navigate(&self, route: Route) {
        match route {
            Route::Login => println!("🔒 会话无效，请先执行 login（{}）", route.path()),
            Route::Main => info!("[CLI/Nav] ➡️ {}", route.path()),
        }
    }
}

struct CliErrorReporter;

#[async_trait::async_trait]
impl ErrorReporter for CliErrorReporter {
    async fn on_error(&self, operation: &str, err: &AdminError) {
        error!("[CLI/Error] {}失败: {}", operation, err);
        if !err.is_unauthorized() {
            eprintln!("⚠️ {}失败: {}", operation, err);
        }
    }
}

fn print_table(table: &Table) {
    println!("{}", table.to_text());
}

fn print_paged<T, F>(table: &Table, query: &PagedQuery<T, F>)
where
    T: Clone + Send + Sync,
    F: Clone + Send + Sync,
{
    print_table(table);
    println!(
        "第 {}/{} 页  {}",
        query.current_page(),
        query.total_pages(),
        query.controls().to_text()
    );
}

fn print_report_detail(detail: &ReportDetail) {
    println!(
        "[{}] 举报 #{}  对象 #{}",
        detail.kind().label(),
        detail.report_no(),
        detail.target_no()
    );
    let status = match detail {
        ReportDetail::Post(d) => &d.status,
        ReportDetail::Reply(d) => &d.status,
    };
    println!("状态: {}", report_status_label(status));
    println!("内容: {}", detail.target_content());
    if let Some(url) = detail.image_url() {
        println!("图片: {}", url);
    }
}

async fn run(args: Args, client: Arc<AdminClient>) -> Result<()> {
    let page_size = args.page_size;
    match args.command {
        Command::Login { account, password } => {
            let auth = AuthService::new(client);
            match auth.login(&account, &password).await {
                Ok(true) => println!("✅ 登录成功"),
                Ok(false) => println!("⚠️ 响应中没有 token，未保存会话"),
                Err(e) => {
                    if let Some(message) = auth.error_message() {
                        println!("{}", message);
                    }
                    return Err(e.into());
                }
            }
        }
        Command::Signup {
            account,
            password,
            invite_code,
        } => {
            let auth = AuthService::new(client);
            if let Err(e) = auth.signup(&account, &password, &invite_code).await {
                if let Some(message) = auth.error_message() {
                    println!("{}", message);
                }
                return Err(e.into());
            }
            println!("✅ 注册成功，请登录");
        }
        Command::Logout => {
            AuthService::new(client).logout().await?;
            println!("✅ 已登出");
        }
        Command::Check => {
            let route = AuthService::new(client).check_session().await;
            println!("{}", route.path());
        }
        Command::Members {
            page,
            blacklist,
            keyword,
        } => {
            let view = MemberView::new(client, page_size);
            let filter = MemberFilter {
                tab: if blacklist {
                    MemberTab::Blacklist
                } else {
                    MemberTab::All
                },
                keyword: keyword.unwrap_or_default(),
            };
            println!("[{}]", filter.tab.label());
            view.query().open_with(filter, page).await?;
            print_paged(&view.table(), view.query());
        }
        Command::Blacklist { member_id, page } => {
            let view = MemberView::new(client, page_size);
            view.query().open_at(page).await?;
            let blacklisted = view.toggle_blacklist(&member_id).await?;
            println!(
                "✅ 会员 {} {}",
                member_id,
                if blacklisted { "已加入黑名单" } else { "已移出黑名单" }
            );
            print_paged(&view.table(), view.query());
        }
        Command::Reports { kind, page } => {
            let view = ReportView::new(client, page_size);
            view.open_tab(kind.into(), page).await?;
            print_paged(&view.table(), view.active_query());
        }
        Command::ReportDetail { kind, report_no } => {
            let view = ReportView::new(client, page_size);
            let pane = view.open_detail_direct(kind.into(), report_no).await?;
            print_report_detail(&pane.detail);
            if let Some(table) = view.related_table() {
                print_table(&table);
            }
        }
        Command::ReportResolve {
            kind,
            report_no,
            status,
            select,
        } => {
            let view = ReportView::new(client, page_size);
            view.open_detail_direct(kind.into(), report_no).await?;
            let select = if select.is_empty() {
                vec![report_no]
            } else {
                select
            };
            for no in select {
                view.toggle_row(no)?;
            }
            let resolved = view.resolve_selected(status.into()).await?;
            println!("✅ 已处理 {} 条举报", resolved);
            if let Some(table) = view.related_table() {
                print_table(&table);
            }
        }
        Command::Challenges { status, show } => {
            let view = ChallengeView::new(client);
            view.set_status(status.into()).await?;
            print_table(&view.table());
            println!("共 {} 个", view.count());
            if let Some(challenge_no) = show {
                view.select(challenge_no)?;
            }
            if let Some(c) = view.selected() {
                println!("\n[{}] {}", c.challenge_no, c.title);
                println!("  이미지: {}", c.image_url.as_deref().unwrap_or("-"));
                println!("  참여자: {}", c.participants_count);
                println!("  남은 시간: {}", c.remaining_time);
            }
        }
        Command::ChallengeCreate {
            title,
            content,
            category,
            goal,
            goal_detail,
            start_date,
            end_date,
            image,
        } => {
            let image = match image {
                Some(path) => Some(ChallengeImage::from_path(&path).await?),
                None => None,
            };
            let draft = NewChallenge {
                title,
                content,
                category: category.into(),
                goal,
                goal_detail,
                start_date,
                end_date,
                image,
            };
            let view = ChallengeView::new(client);
            view.create(draft).await?;
            println!("✅ 챌린지가 저장되었습니다.");
            print_table(&view.table());
        }
        Command::Feedbacks { page, filter } => {
            let view = FeedbackView::new(client, page_size);
            let filter: ReplyFilter = filter.into();
            println!("[{}]", filter.label());
            view.query().open_with(filter, page).await?;
            print_paged(&view.table(), view.query());
        }
        Command::Reply {
            feedback_no,
            content,
            page,
        } => {
            let view = FeedbackView::new(client, page_size);
            view.open_at(page).await?;
            view.set_reply_draft(feedback_no, content);
            view.submit_reply(feedback_no).await?;
            println!("✅ 已回复反馈 {}", feedback_no);
            print_paged(&view.table(), view.query());
        }
        Command::Faqs => {
            let view = FaqView::new(client);
            view.load().await?;
            print_table(&view.table());
        }
        Command::FaqAdd { question, answer } => {
            let view = FaqView::new(client);
            view.create(FaqDraft::new(question, answer)).await?;
            print_table(&view.table());
        }
        Command::FaqEdit {
            faq_no,
            question,
            answer,
        } => {
            let view = FaqView::new(client);
            view.load().await?;
            view.begin_edit(faq_no)?;
            if let Some(question) = question {
                view.edit_question(question)?;
            }
            if let Some(answer) = answer {
                view.edit_answer(answer)?;
            }
            view.save_edit().await?;
            print_table(&view.table());
        }
        Command::FaqDelete { faq_no } => {
            let view = FaqView::new(client);
            view.delete(faq_no).await?;
            print_table(&view.table());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(&args.log_level, &args.log_file)?;

    let config = AdminConfig::new(args.api_base_url.clone())
        .with_session_db_url(args.session_db.clone())
        .with_page_size(args.page_size);

    let client = AdminClient::connect(&config)
        .await
        .map_err(|e| anyhow::anyhow!("初始化客户端失败: {}", e))?
        .with_navigation_listener(Arc::new(CliNavigationListener))
        .with_error_reporter(Arc::new(CliErrorReporter));
    info!("[CLI] 🚀 API: {}", client.base_url());

    run(args, Arc::new(client)).await
}
