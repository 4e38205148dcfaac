//! Demo data written into empty storage on first open.
//!
//! Users and profiles are fixed. Tasks are generated for the whole calendar
//! year of `today`: a daily routine, weekly and monthly appointments, and an
//! occasional one-off task drawn from a pool.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc, Weekday};
use rand::Rng;

use domain::{
    ElderlyProfile, Gender, Task, TaskPriority, TaskStatus, TaskType, User, UserRole,
    PRIMARY_ADMIN_ID, SYSTEM_CREATOR_ID,
};

use TaskPriority::{Critical, High, Low, Medium};
use TaskType::{Activity, Appointment, Hygiene, Meal, Medication};

/// Chance that a past task was done rather than skipped
const PAST_COMPLETION_RATE: f64 = 0.95;

/// Chance that a day gets one extra task from the pool
const EXTRA_TASK_RATE: f64 = 0.20;

/// Initial content for the three collections
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub users: Vec<User>,
    pub profiles: Vec<ElderlyProfile>,
    pub tasks: Vec<Task>,
}

impl SeedData {
    /// Seed data for the current year
    pub fn defaults() -> Self {
        Self::generate(Utc::now(), &mut rand::thread_rng())
    }

    pub fn generate<R: Rng>(today: DateTime<Utc>, rng: &mut R) -> Self {
        Self {
            users: default_users(),
            profiles: default_profiles(),
            tasks: yearly_tasks(today, rng),
        }
    }
}

fn user(id: &str, name: &str, email: &str, password: &str, role: UserRole, avatar: &str, color: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        avatar_url: format!("https://api.dicebear.com/7.x/avataaars/svg?{}", avatar),
        role,
        color: color.to_string(),
    }
}

pub fn default_users() -> Vec<User> {
    vec![
        user(
            PRIMARY_ADMIN_ID,
            "Ana Maria (Filha)",
            "admin",
            "admin",
            UserRole::Admin,
            "seed=AnaMaria&backgroundColor=b6e3f4&hair=long&clothing=blazerAndShirt",
            "bg-blue-100 text-blue-800",
        ),
        user(
            "u2",
            "Carlos (Genro)",
            "carlos@familia.com",
            "123",
            UserRole::Member,
            "seed=Carlos&backgroundColor=c0aede&facialHair=beardMedium",
            "bg-emerald-100 text-emerald-800",
        ),
        user(
            "u_mariana",
            "Mariana (Neta)",
            "mariana@familia.com",
            "123",
            UserRole::Member,
            "seed=Mariana&backgroundColor=ffd5dc",
            "bg-pink-100 text-pink-800",
        ),
        user(
            "u4",
            "Enf. Solange",
            "solange@care.com",
            "123",
            UserRole::Member,
            "seed=Solange&backgroundColor=d1d4f9&clothing=overall",
            "bg-orange-100 text-orange-800",
        ),
    ]
}

fn profile(id: &str, name: &str, gender: Gender, avatar: &str, conditions: &[&str], notes: &str) -> ElderlyProfile {
    ElderlyProfile {
        id: id.to_string(),
        name: name.to_string(),
        gender,
        avatar_url: format!("https://api.dicebear.com/7.x/avataaars/svg?{}", avatar),
        conditions: conditions.iter().map(|c| c.to_string()).collect(),
        notes: notes.to_string(),
    }
}

pub fn default_profiles() -> Vec<ElderlyProfile> {
    vec![
        profile(
            "e1",
            "Vô Sebastião",
            Gender::Male,
            "seed=Sebastiao&backgroundColor=b6e3f4&facialHair=beardMajestic&clothing=shirtScoopNeck",
            &["Hipertensão", "Diabetes Tipo 2"],
            "Precisa de ajuda para caminhar longas distâncias. Monitorar glicemia.",
        ),
        profile(
            "e2",
            "Vó Alzira",
            Gender::Female,
            "seed=Alzira&backgroundColor=ffdfbf&hair=grayMedium&clothing=collarAndSweater",
            &["Alzheimer (Estágio Inicial)"],
            "Gosta de ouvir música clássica. Fica agitada no final da tarde.",
        ),
        profile(
            "e3",
            "Tio Paulo",
            Gender::Male,
            "seed=Paulo&backgroundColor=d1d4f9&glasses=round",
            &["Mobilidade Reduzida"],
            "Usa andador. Fisioterapia às terças e quintas.",
        ),
    ]
}

/// A recurring or pooled task: title, description, profile, hour, type,
/// priority, assignee.
type Template = (
    &'static str,
    &'static str,
    &'static str,
    u32,
    TaskType,
    TaskPriority,
    Option<&'static str>,
);

const DAILY: &[Template] = &[
    ("Medir Glicemia", "Anotar valor. Meta < 110.", "e1", 7, Medication, High, Some(PRIMARY_ADMIN_ID)),
    ("Café da Manhã", "Mamão, aveia e torrada.", "e1", 8, Meal, Medium, Some(PRIMARY_ADMIN_ID)),
    ("Café da Manhã", "Vitamina e remédios matinais.", "e2", 8, Meal, Medium, Some("u4")),
    ("Remédio Pressão", "Losartana 50mg.", "e1", 9, Medication, Critical, None),
    ("Almoço em Família", "Dieta hipossódica.", "e1", 12, Meal, Medium, None),
    ("Almoço", "Ajudar a cortar a carne.", "e2", 12, Meal, Medium, Some("u4")),
    ("Lanche da Tarde", "Fruta ou iogurte.", "e2", 15, Meal, Low, None),
    ("Banho Assistido", "Cuidado com piso molhado.", "e2", 18, Hygiene, High, Some("u4")),
    ("Jantar Leve", "Sopa ou Caldo.", "e1", 19, Meal, Medium, Some("u2")),
    ("Medicação Noturna", "Antipsicótico prescrito.", "e2", 20, Medication, Critical, Some(PRIMARY_ADMIN_ID)),
];

const PHYSIO_DAYS: &[Template] = &[
    ("Sessão de Fisioterapia", "Levar à clínica Santa Clara.", "e3", 14, Appointment, High, Some("u2")),
    ("Exercícios em Casa", "Repetir série da fisio.", "e3", 10, Activity, Medium, None),
];

const WEEKEND: &[Template] = &[
    ("Passeio no Parque", "Tomar sol e caminhar 20min.", "e1", 16, Activity, Medium, Some("u_mariana")),
    ("Visita da Mariana", "Jogar cartas ou conversar.", "e2", 15, Activity, Low, Some("u_mariana")),
];

const HYDRO_DAYS: &[Template] = &[
    ("Hidroginástica", "Preparar bolsa com toalha.", "e2", 9, Activity, Medium, Some("u4")),
];

const MONTHLY_PHARMACY: Template = (
    "Comprar Remédios do Mês",
    "Verificar lista na geladeira.",
    "e1",
    10,
    Activity,
    High,
    Some(PRIMARY_ADMIN_ID),
);

const MONTHLY_CARDIO: Template = (
    "Cardiologista Dr. Silva",
    "Levar exames recentes.",
    "e1",
    14,
    Appointment,
    Critical,
    Some(PRIMARY_ADMIN_ID),
);

/// One-off tasks; the profile is picked at random
const POOL: &[Template] = &[
    ("Comprar Fraldas Geriátricas", "Estoque do mês acabando.", "", 10, Activity, High, Some(PRIMARY_ADMIN_ID)),
    ("Cortar Cabelo", "Barbeiro vem em casa.", "", 14, Hygiene, Medium, Some("u4")),
    ("Trocar Curativo", "Pequeno corte no braço.", "", 11, Hygiene, High, Some("u4")),
    ("Visita do Primo Zé", "Vai passar a tarde para o café.", "", 15, Activity, Low, None),
    ("Consertar Cadeira de Banho", "Roda esquerda travando.", "", 9, Activity, High, Some("u2")),
    ("Ligar para Farmácia", "Pedir entrega de analgésicos.", "", 10, Activity, Medium, Some(PRIMARY_ADMIN_ID)),
    ("Exame de Sangue", "Jejum de 8h necessário.", "", 7, Appointment, Critical, Some(PRIMARY_ADMIN_ID)),
    ("Tomar Vacina Gripe", "Campanha anual no posto.", "", 9, Appointment, High, Some("u2")),
    ("Almoço de Aniversário", "Comemorar com a família toda.", "", 12, Meal, Medium, None),
    ("Hidratar Pele", "Pele muito seca nas pernas.", "", 19, Hygiene, Medium, Some("u4")),
    ("Cortar Unhas", "Mãos e pés.", "", 16, Hygiene, Low, Some("u4")),
    ("Dentista (Emergência)", "Dor no dente molar.", "", 11, Appointment, Critical, Some(PRIMARY_ADMIN_ID)),
];

const POOL_PROFILES: &[&str] = &["e1", "e2", "e3"];

struct Generator<'r, R> {
    now: DateTime<Utc>,
    rng: &'r mut R,
    next_id: usize,
    tasks: Vec<Task>,
}

impl<R: Rng> Generator<'_, R> {
    fn add(&mut self, day: NaiveDate, template: &Template, elderly_id: &str) {
        let (title, description, _, hour, task_type, priority, assignee) = *template;
        let scheduled_at = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
            + Duration::hours(i64::from(hour));

        let today = self.now.date_naive();
        let (status, completed_at) = if day < today {
            if self.rng.gen_bool(PAST_COMPLETION_RATE) {
                (TaskStatus::Completed, Some(scheduled_at + Duration::minutes(30)))
            } else {
                (TaskStatus::Skipped, None)
            }
        } else if day == today && hour < self.now.hour() {
            (TaskStatus::Completed, Some(scheduled_at + Duration::minutes(12)))
        } else {
            (TaskStatus::Pending, None)
        };

        self.next_id += 1;
        self.tasks.push(Task {
            id: format!("auto_t_{}", self.next_id),
            title: title.to_string(),
            description: Some(description.to_string()),
            elderly_id: elderly_id.to_string(),
            assigned_to_id: assignee.map(str::to_string),
            created_by: SYSTEM_CREATOR_ID.to_string(),
            scheduled_at,
            completed_at,
            status,
            priority,
            task_type,
        });
    }

    fn add_all(&mut self, day: NaiveDate, templates: &[Template]) {
        for template in templates {
            self.add(day, template, template.2);
        }
    }
}

/// Every task for the calendar year containing `today`
pub fn yearly_tasks<R: Rng>(today: DateTime<Utc>, rng: &mut R) -> Vec<Task> {
    let date = today.date_naive();
    let year_start = date - Duration::days(i64::from(date.ordinal0()));

    let mut generator = Generator {
        now: today,
        rng,
        next_id: 0,
        tasks: Vec::new(),
    };

    for day in year_start.iter_days().take_while(|d| d.year() == date.year()) {
        generator.add_all(day, DAILY);

        match day.weekday() {
            Weekday::Tue | Weekday::Thu => generator.add_all(day, PHYSIO_DAYS),
            Weekday::Sat | Weekday::Sun => generator.add_all(day, WEEKEND),
            Weekday::Mon | Weekday::Wed => generator.add_all(day, HYDRO_DAYS),
            Weekday::Fri => {}
        }

        match day.day() {
            5 => generator.add(day, &MONTHLY_PHARMACY, MONTHLY_PHARMACY.2),
            15 => generator.add(day, &MONTHLY_CARDIO, MONTHLY_CARDIO.2),
            _ => {}
        }

        if generator.rng.gen_bool(EXTRA_TASK_RATE) {
            let template = &POOL[generator.rng.gen_range(0..POOL.len())];
            let elderly_id = POOL_PROFILES[generator.rng.gen_range(0..POOL_PROFILES.len())];
            generator.add(day, template, elderly_id);
        }
    }

    generator.tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 13, 30, 0).unwrap()
    }

    fn seeded() -> SeedData {
        SeedData::generate(today(), &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_default_users_include_primary_admin() {
        let users = default_users();
        assert_eq!(users.len(), 4);

        let admin = &users[0];
        assert_eq!(admin.id, PRIMARY_ADMIN_ID);
        assert!(admin.is_admin());
        assert!(admin.matches_login("admin"));
        assert!(admin.check_password("admin"));
        assert!(users[1..].iter().all(|u| !u.is_admin()));
    }

    #[test]
    fn test_default_profiles() {
        let profiles = default_profiles();
        let ids: Vec<_> = profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["e1", "e2", "e3"]);
        assert_eq!(profiles[1].gender, Gender::Female);
    }

    #[test]
    fn test_tasks_cover_the_whole_year() {
        let seed = seeded();
        let first = seed.tasks.iter().map(|t| t.scheduled_day()).min().unwrap();
        let last = seed.tasks.iter().map(|t| t.scheduled_day()).max().unwrap();

        assert_eq!(first, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        // At least the daily routine for 365 days
        assert!(seed.tasks.len() >= 365 * DAILY.len());
    }

    #[test]
    fn test_ids_are_unique_and_sequential() {
        let seed = seeded();
        assert_eq!(seed.tasks[0].id, "auto_t_1");
        let mut ids: Vec<_> = seed.tasks.iter().map(|t| t.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), seed.tasks.len());
    }

    #[test]
    fn test_status_follows_the_calendar() {
        let now = today();
        for task in seeded().tasks {
            assert_eq!(task.completed_at.is_some(), task.is_completed(), "{}", task.id);

            let day = task.scheduled_day();
            if day < now.date_naive() {
                assert!(matches!(task.status, TaskStatus::Completed | TaskStatus::Skipped));
            } else if day > now.date_naive() {
                assert_eq!(task.status, TaskStatus::Pending);
            } else if task.scheduled_at.hour() < now.hour() {
                assert_eq!(task.status, TaskStatus::Completed);
            } else {
                assert_eq!(task.status, TaskStatus::Pending);
            }
        }
    }

    #[test]
    fn test_past_completion_is_half_an_hour_late() {
        let task = seeded()
            .tasks
            .into_iter()
            .find(|t| t.scheduled_day() < today().date_naive() && t.is_completed())
            .unwrap();
        assert_eq!(task.completed_at, Some(task.scheduled_at + Duration::minutes(30)));
    }

    #[test]
    fn test_weekly_and_monthly_routines() {
        let seed = seeded();
        // 2026-03-10 is a Tuesday
        let tuesday = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert!(seed
            .tasks
            .iter()
            .any(|t| t.scheduled_day() == tuesday && t.title == "Sessão de Fisioterapia"));

        let fifteenth = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        assert!(seed
            .tasks
            .iter()
            .any(|t| t.scheduled_day() == fifteenth && t.priority == Critical && t.elderly_id == "e1"));
    }

    #[test]
    fn test_assignees_reference_known_users() {
        let users = default_users();
        for task in seeded().tasks {
            if let Some(id) = &task.assigned_to_id {
                assert!(users.iter().any(|u| &u.id == id), "unknown assignee {}", id);
            }
        }
    }
}
