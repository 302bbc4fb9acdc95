pub const TOO_SHORT_REPLY: &str =
    "🤔 Could you please provide more details about what you'd like to know?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Salary,
    Skills,
    Interview,
    CareerPath,
    Education,
    Greeting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    TooShort,
    Topic(Topic),
}

impl Route {
    pub fn reply(self) -> &'static str {
        match self {
            Route::TooShort => TOO_SHORT_REPLY,
            Route::Topic(topic) => topic.reply(),
        }
    }
}

impl Topic {
    pub const PRIORITY: [Topic; 6] = [
        Topic::Salary,
        Topic::Skills,
        Topic::Interview,
        Topic::CareerPath,
        Topic::Education,
        Topic::Greeting,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Topic::Salary => &["salary", "pay", "wage", "compensation"],
            Topic::Skills => &["skill", "learn", "study", "course"],
            Topic::Interview => &["interview", "preparation", "tips", "job application"],
            Topic::CareerPath => &["career", "path", "role", "job", "profession"],
            Topic::Education => &["degree", "education", "college", "university"],
            Topic::Greeting => &["hello", "hi", "help", "start", "hey"],
        }
    }

    pub fn matches(self, normalized: &str) -> bool {
        self.keywords()
            .iter()
            .any(|keyword| normalized.contains(keyword))
    }

    pub fn reply(self) -> &'static str {
        match self {
            Topic::Salary => SALARY_REPLY,
            Topic::Skills => SKILLS_REPLY,
            Topic::Interview => INTERVIEW_REPLY,
            Topic::CareerPath => CAREER_PATH_REPLY,
            Topic::Education => EDUCATION_REPLY,
            Topic::Greeting => GREETING_REPLY,
        }
    }
}

pub fn normalize(message: &str) -> String {
    message.trim().to_lowercase()
}

/// `None` means no prepared answer applies and the model should be asked.
pub fn route(message: &str) -> Option<Route> {
    let normalized = normalize(message);

    // length in UTF-16 units, so one emoji counts as two
    if normalized.encode_utf16().count() < 2 {
        return Some(Route::TooShort);
    }

    Topic::PRIORITY
        .into_iter()
        .find(|topic| topic.matches(&normalized))
        .map(Route::Topic)
}

const SALARY_REPLY: &str = "💰 **Salary Information**

Salary varies by role, experience, and location:

• **Entry Level (0-2 years):** $40K-$70K
• **Mid Level (3-5 years):** $70K-$120K
• **Senior Level (5+ years):** $120K-$200K+

**Factors affecting salary:**
- Technical skills depth
- Industry domain
- Company size
- Geographic location
- Years of experience

💡 Would you like specific salary info for a particular role or location?";

const SKILLS_REPLY: &str = "🚀 **Essential Skills Development**

**Technical Skills:**
• Programming languages (Python, JavaScript, Java, C++)
• Frameworks & libraries (React, Node.js, Django)
• Database management (SQL, NoSQL)
• Cloud platforms (AWS, Azure, GCP)
• Version control (Git, GitHub)

**Soft Skills:**
• Problem-solving & critical thinking
• Communication & presentation
• Teamwork & collaboration
• Time management & organization
• Adaptability & learning agility

**Learning Resources:**
• Online: Coursera, Udemy, Pluralsight, freeCodeCamp
• Practice: GitHub projects, Kaggle competitions
• Reading: Tech blogs, documentation, books

🎯 What specific skill area interests you most?";

const INTERVIEW_REPLY: &str = "🎯 **Interview Preparation Guide**

**Before the Interview:**
• Research the company & role thoroughly
• Practice coding problems (LeetCode, HackerRank)
• Prepare STAR method examples
• Review your projects & achievements
• Prepare thoughtful questions to ask

**During the Interview:**
• Ask clarifying questions
• Think out loud while problem-solving
• Show enthusiasm and genuine interest
• Demonstrate cultural fit
• Follow up with thank-you notes

**Common Questions:**
• Technical challenges you've solved
• Why you want this specific role
• Your short-term & long-term career goals
• Behavioral scenarios (teamwork, conflict resolution)

💪 Need help with any specific interview aspect?";

const CAREER_PATH_REPLY: &str = "🛤️ **Career Path Options**

**Popular Tech Roles:**
• **Frontend Developer:** UI/UX, React, Vue.js
• **Backend Developer:** APIs, databases, server logic
• **Full Stack Developer:** Complete web applications
• **Data Scientist:** Analytics, ML, Python/R
• **DevOps Engineer:** Infrastructure, deployment, CI/CD
• **Product Manager:** Strategy, roadmaps, coordination
• **UX/UI Designer:** User experience & interface design
• **Cybersecurity Specialist:** Security, compliance, risk

**Career Progression:**
Junior → Mid-level → Senior → Tech Lead → Architect/Manager → Director

**Growth Tips:**
• Build a strong portfolio with diverse projects
• Contribute to open source projects
• Network with industry professionals
• Stay updated with emerging technologies
• Pursue relevant certifications

🚀 Which career path interests you most?";

const EDUCATION_REPLY: &str = "🎓 **Education & Career Guidance**

**Traditional Paths:**
• Computer Science/Engineering degrees
• Information Technology programs
• Business/Management degrees
• Specialized certifications

**Alternative Paths:**
• Coding bootcamps (3-6 months)
• Online courses & self-learning
• Professional certifications
• Portfolio-based learning

**Industry Reality:**
• Skills matter more than degrees in many tech roles
• Continuous learning is essential
• Experience & projects often outweigh formal education
• Many successful professionals are self-taught

📚 What's your current educational background or learning preference?";

const GREETING_REPLY: &str = "👋 **Welcome to Career Vision!**

I'm your AI career counselor, ready to help you navigate your professional journey!

🎯 **Career Planning**
• Role recommendations based on your interests
• Career progression pathways
• Industry insights & trends

📚 **Skill Development**
• Personalized learning roadmaps
• Course & certification recommendations
• Technology stack guidance

💼 **Job Preparation**
• Interview strategies & practice
• Resume optimization tips
• Salary negotiation advice

📊 **Market Intelligence**
• Job market analysis
• Emerging technology demands
• Career opportunity insights

✨ **What would you like to explore first?** Just ask me anything about careers, skills, interviews, or professional growth!";
