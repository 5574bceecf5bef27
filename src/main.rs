use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use job_portal::auth;
use job_portal::form::{FieldSpec, FormModel};
use job_portal::resources::{self, Resource};
use job_portal::save_flow::{self, SaveFlow};
use job_portal::table::{self, SortDirection, TableRow, PAGE_SIZE};
use job_portal::types::{JobPosting, User};
use job_portal::utils;
use job_portal::{EnvironmentConfig, Navigator, Portal};

#[derive(Parser)]
#[command(name = "lokerku")]
#[command(about = "Klien portal lowongan kerja SMK")]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Masuk dengan NISN dan kata sandi
    Login {
        nisn: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Hapus semua sesi tersimpan
    Logout,
    /// Profil akun yang sedang masuk
    Profile,
    /// Kelola data pengguna (admin)
    Pengguna {
        #[command(subcommand)]
        command: CrudCommand,
    },
    /// Kelola data perusahaan (admin)
    Perusahaan {
        #[command(subcommand)]
        command: CrudCommand,
    },
    /// Kelola dan lihat lowongan
    Lowongan {
        #[command(subcommand)]
        command: LowonganCommand,
    },
    /// Lowongan tersimpan (pelamar)
    Simpan {
        #[command(subcommand)]
        command: SimpanCommand,
    },
}

#[derive(Subcommand)]
enum CrudCommand {
    /// Tampilkan daftar dengan pencarian, urutan, dan halaman
    List(ListArgs),
    /// Tambah data baru dari pasangan --field name=value
    Create {
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Edit data yang sudah ada
    Update {
        id: i64,
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Hapus data secara permanen
    Delete { id: i64 },
    /// Impor dari berkas spreadsheet (.xlsx/.xls)
    Import { file: PathBuf },
    /// Ekspor ke berkas spreadsheet di direktori unduhan
    Export,
}

#[derive(Args)]
struct ListArgs {
    /// Saring berdasarkan nama
    #[arg(long)]
    search: Option<String>,
    /// Urutkan kolom nama
    #[arg(long, value_enum)]
    sort_nama: Option<SortArg>,
    /// Urutkan kolom ID/NISN
    #[arg(long, value_enum)]
    sort_id: Option<SortArg>,
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Subcommand)]
enum LowonganCommand {
    #[command(flatten)]
    Crud(CrudCommand),
    /// Detail lowongan, dengan opsi simpan dan daftar
    View {
        id: i64,
        /// Simpan lowongan ini
        #[arg(long)]
        save: bool,
        /// Buka link pendaftaran eksternal
        #[arg(long)]
        apply: bool,
        /// Lewati konfirmasi
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SimpanCommand {
    /// Daftar lowongan tersimpan
    List,
    /// Hapus lowongan dari daftar simpan
    Hapus { lowongan_id: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortDirection {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Asc => SortDirection::Asc,
            SortArg::Desc => SortDirection::Desc,
        }
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Format field harus name=value, bukan {:?}", raw)),
    }
}

/// The CLI has no page to send the user back to; an expired session is
/// reported and the next command starts from login.
struct CliNavigator;

impl Navigator for CliNavigator {
    fn redirect(&self, path: &str) {
        warn!("Session expired, redirecting to {}", path);
        eprintln!("Sesi berakhir, silakan login kembali.");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = EnvironmentConfig::load(&cli.config)?;
    config.ensure_directories().await?;

    let portal = Portal::connect(config, Arc::new(CliNavigator))?;
    run(cli.command, &portal).await
}

async fn run(command: Command, portal: &Portal) -> Result<()> {
    let client = &portal.client;

    match command {
        Command::Login { nisn, password } => {
            client.set_location("/");
            let katasandi = match password {
                Some(password) => password,
                None => prompt("Kata sandi: ")?,
            };

            let outcome = auth::login(client, &nisn, &katasandi).await?;
            println!("Login berhasil! Lanjut ke {}", outcome.redirect_to);
        }
        Command::Logout => {
            auth::logout(client)?;
            println!("Sesi dihapus.");
        }
        Command::Profile => {
            client.set_location("/Id/profile");
            let user = auth::profile(client).await?;
            print_profile(&user);
        }
        Command::Pengguna { command } => {
            client.set_location("/admin/pengguna");
            run_crud(command, portal, resources::pengguna(), resources::pengguna_form()).await?;
        }
        Command::Perusahaan { command } => {
            client.set_location("/admin/perusahaan");
            run_crud(command, portal, resources::perusahaan(), resources::perusahaan_form())
                .await?;
        }
        Command::Lowongan { command } => match command {
            LowonganCommand::Crud(command) => {
                client.set_location("/admin/lowongan");

                let needs_companies =
                    matches!(command, CrudCommand::Create { .. } | CrudCommand::Update { .. });
                let schema = if needs_companies {
                    let companies = resources::perusahaan().get_all(client).await?;
                    resources::lowongan_form(&companies)
                } else {
                    resources::lowongan_form(&[])
                };

                run_crud(command, portal, resources::lowongan(), schema).await?;
            }
            LowonganCommand::View { id, save, apply, yes } => {
                view_lowongan(portal, id, save, apply, yes).await?;
            }
        },
        Command::Simpan { command } => {
            client.set_location("/Id/simpan");
            let profil = auth::profile(client)
                .await
                .context("Gagal mendapatkan ID pengguna.")?;

            match command {
                SimpanCommand::List => {
                    let saved = save_flow::saved_jobs(client, profil.id)
                        .await
                        .context("Gagal memuat lowongan tersimpan.")?;

                    if saved.is_empty() {
                        println!("Belum ada lowongan tersimpan.");
                    }
                    for entry in &saved {
                        println!(
                            "[{}] {} (disimpan {})",
                            entry.lowongan.id,
                            entry.lowongan.nama,
                            utils::format_date(&entry.tanggal)
                        );
                    }
                }
                SimpanCommand::Hapus { lowongan_id } => {
                    save_flow::unsave_job(client, profil.id, lowongan_id).await?;
                    println!("Lowongan berhasil dihapus dari daftar simpan.");
                }
            }
        }
    }

    Ok(())
}

async fn run_crud<T>(
    command: CrudCommand,
    portal: &Portal,
    resource: Resource<T>,
    schema: Vec<FieldSpec>,
) -> Result<()>
where
    T: serde::de::DeserializeOwned + TableRow,
{
    let client = &portal.client;

    match command {
        CrudCommand::List(args) => {
            let rows = resource.get_all(client).await?;
            render_table(&rows, &args);
        }
        CrudCommand::Create { fields } => {
            let mut form = FormModel::add(schema);
            apply_fields(&mut form, &fields)?;
            let payload = submit_or_report(&form)?;

            resource.create(client, &payload).await?;
            println!("Berhasil! Data {} ditambahkan.", resource.base());
        }
        CrudCommand::Update { id, fields } => {
            let record = resource.get_raw(client, id).await?;
            let mut form = FormModel::edit(schema, &record);
            apply_fields(&mut form, &fields)?;
            let payload = submit_or_report(&form)?;

            resource.update(client, id, &payload).await?;
            println!("Berhasil! Data {} diperbarui.", resource.base());
        }
        CrudCommand::Delete { id } => {
            resource.delete(client, id).await?;
            println!("Dihapus! Data {} telah dihapus.", resource.base());
        }
        CrudCommand::Import { file } => {
            resource.import(client, &file).await?;
            // Refresh after import, as the pages do.
            let rows = resource.get_all(client).await?;
            println!(
                "Berhasil! Data {} diimpor, {} baris dimuat ulang.",
                resource.base(),
                rows.len()
            );
        }
        CrudCommand::Export => {
            let path = resource.export(client, &portal.config.download_path).await?;
            println!("Ekspor selesai: {}", path.display());
        }
    }

    Ok(())
}

fn render_table<T: TableRow>(rows: &[T], args: &ListArgs) {
    let term = args.search.as_deref().unwrap_or("");

    let mut view = table::filter_rows(rows, term, |row| row.key_text());
    if let Some(direction) = args.sort_nama {
        table::sort_by_text(&mut view, direction.into(), |row| row.key_text());
    } else if let Some(direction) = args.sort_id {
        table::sort_by_numeric(&mut view, direction.into(), |row| row.key_numeric());
    }

    let page = table::paginate(view, args.page, PAGE_SIZE);

    println!("{}", T::headers().join(" | "));
    for row in &page.rows {
        let mut cells = row.cells();
        if let Some(first) = cells.first_mut() {
            *first = highlight_ansi(first, term);
        }
        println!("{}", cells.join(" | "));
    }

    if page.total_pages > 1 {
        println!(
            "Halaman {} dari {} (sebelumnya: {}, berikutnya: {})",
            page.page,
            page.total_pages,
            if page.has_prev { "tersedia" } else { "nonaktif" },
            if page.has_next { "tersedia" } else { "nonaktif" },
        );
    }
}

fn highlight_ansi(text: &str, term: &str) -> String {
    table::highlight(text, term)
        .into_iter()
        .map(|segment| {
            if segment.highlighted {
                format!("\x1b[43m{}\x1b[0m", segment.text)
            } else {
                segment.text
            }
        })
        .collect()
}

async fn view_lowongan(portal: &Portal, id: i64, save: bool, apply: bool, yes: bool) -> Result<()> {
    let client = &portal.client;
    client.set_location(&format!("/Id/lowongan/{}", id));

    let job = if save {
        // Detail and profile load concurrently; both must resolve before
        // anything renders.
        let lowongan = resources::lowongan();
        let (job, profil) =
            tokio::try_join!(lowongan.get(client, id), auth::profile(client))?;

        print_job(&job);
        run_save_flow(portal, &profil, &job).await?;
        job
    } else {
        let job = resources::lowongan()
            .get(client, id)
            .await
            .context("Gagal memuat detail lowongan.")?;
        print_job(&job);
        job
    };

    if apply {
        match job.registration_link() {
            None => println!("Pendaftaran Tidak Tersedia"),
            Some(link) => {
                let confirmed = yes
                    || confirm(
                        "Anda akan diarahkan ke halaman pendaftaran eksternal. Lanjutkan? [y/N] ",
                    )?;

                match save_flow::apply_target(Some(link), confirmed) {
                    Some(target) => println!("Membuka {}", target),
                    None => println!("Dibatalkan."),
                }
            }
        }
    }

    Ok(())
}

async fn run_save_flow(portal: &Portal, profil: &User, job: &JobPosting) -> Result<()> {
    let client = &portal.client;
    let mut flow = SaveFlow::new();

    let already_saved = save_flow::check_saved(client, &mut flow, profil.id, job.id).await?;
    if already_saved {
        println!("Lowongan sudah disimpan, tombol simpan dinonaktifkan.");
        return Ok(());
    }

    println!("Menyimpan...");
    match save_flow::save(client, &mut flow, profil.id, job.id).await {
        Ok(()) => {
            println!("Lowongan berhasil disimpan.");
            Ok(())
        }
        Err(error) => {
            println!("Gagal menyimpan, coba lagi.");
            Err(error)
        }
    }
}

fn print_profile(user: &User) {
    println!("Nama    : {}", user.nama);
    println!("Email   : {}", user.email);
    println!("Peran   : {}", user.peran);
    println!("NISN    : {}", user.nisn);
    if let Some(alamat) = &user.alamat {
        println!("Alamat  : {}", alamat);
    }
    if let Some(telepon) = &user.telepon {
        println!("Telepon : {}", telepon);
    }
    if let Some(lahir) = &user.tanggal_lahir {
        println!("Lahir   : {}", utils::normalize_date(lahir));
    }
    println!("Menu    : {}", user.peran.menu_entries().join(", "));
}

fn print_job(job: &JobPosting) {
    println!("{}", job.nama);

    match job.salary.as_deref().filter(|salary| !salary.is_empty()) {
        Some(salary) => println!(
            "{} • {}",
            job.jenis_pekerjaan.label(),
            utils::format_salary(salary)
        ),
        None => println!("{}", job.jenis_pekerjaan.label()),
    }

    match &job.expired_at {
        Some(expired) => println!(
            "Dibuat: {} • Berlaku hingga {}",
            utils::format_date(&job.dibuat_pada),
            utils::format_date(expired)
        ),
        None => println!("Dibuat: {}", utils::format_date(&job.dibuat_pada)),
    }

    if let Some(company) = &job.perusahaan {
        println!("Perusahaan: {}", company.nama);
        if let Some(alamat) = &company.alamat {
            println!("Alamat: {}", alamat);
        }
    }

    println!();
    println!("Ketentuan:");
    for line in job.terms() {
        println!("  - {}", line);
    }

    println!();
    println!("Persyaratan:");
    for line in job.requirements() {
        println!("  - {}", line);
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

fn confirm(label: &str) -> Result<bool> {
    let answer = prompt(label)?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "ya"))
}

fn apply_fields(form: &mut FormModel, fields: &[(String, String)]) -> Result<()> {
    for (name, value) in fields {
        form.set(name, value)?;
    }
    Ok(())
}

fn submit_or_report(form: &FormModel) -> Result<BTreeMap<String, String>> {
    match form.submit() {
        Ok(payload) => Ok(payload),
        Err(errors) => {
            for error in &errors {
                eprintln!("{}", error.message);
            }
            anyhow::bail!("Validasi gagal, tidak ada data yang dikirim.")
        }
    }
}
