//! Common Java sources for tests.

// Plain test class: navigate, type into two fields, click, wait, assert
pub const LOGIN_TEST: &str = r#"
package com.example.tests;

import org.junit.Test;
import org.openqa.selenium.By;
import org.openqa.selenium.WebDriver;
import org.openqa.selenium.WebElement;
import org.openqa.selenium.support.ui.ExpectedConditions;
import org.openqa.selenium.support.ui.WebDriverWait;
import static org.junit.Assert.assertTrue;

public class LoginTest {
    private WebDriver driver;

    @Test
    public void logsIn() {
        driver.get("https://example.com/login");
        WebElement user = driver.findElement(By.id("username"));
        user.sendKeys("alice");
        WebElement pass = driver.findElement(By.id("password"));
        pass.sendKeys("secret");
        driver.findElement(By.xpath("//button[@type='submit']")).click();
        new WebDriverWait(driver, Duration.ofSeconds(10))
            .until(ExpectedConditions.visibilityOfElementLocated(By.id("dashboard")));
        assertTrue(driver.getCurrentUrl().contains("dashboard"));
    }
}
"#;

pub const LOGIN_PAGE: &str = r#"
package com.example.pages;

import org.openqa.selenium.WebDriver;
import org.openqa.selenium.WebElement;
import org.openqa.selenium.support.FindBy;

public class LoginPage {
    private WebDriver driver;

    @FindBy(id = "username")
    private WebElement username;

    @FindBy(id = "password")
    private WebElement password;

    @FindBy(css = "button[type=submit]")
    private WebElement submit;

    public LoginPage(WebDriver driver) {
        this.driver = driver;
    }

    public void login(String user, String pass) {
        username.sendKeys(user);
        password.sendKeys(pass);
        submit.click();
    }
}
"#;

pub const DASHBOARD_PAGE: &str = r#"
package com.example.pages;

import org.openqa.selenium.By;
import org.openqa.selenium.WebDriver;

public class DashboardPage {
    private WebDriver driver;

    public DashboardPage(WebDriver driver) {
        this.driver = driver;
    }

    public String greeting() {
        return driver.findElement(By.className("greeting")).getText();
    }
}
"#;

// Suite delegating to both page objects
pub const LOGIN_SUITE_TEST: &str = r#"
package com.example.tests;

import com.example.pages.DashboardPage;
import com.example.pages.LoginPage;
import org.junit.Before;
import org.junit.Test;
import static org.junit.Assert.assertEquals;

public class LoginSuiteTest {
    private WebDriver driver;

    @Before
    public void open() {
        driver.get("https://example.com/login");
    }

    @Test
    public void logsInThroughThePage() {
        LoginPage loginPage = new LoginPage(driver);
        loginPage.login("u", "p");
        DashboardPage dashboard = new DashboardPage(driver);
        assertEquals("Welcome", dashboard.greeting());
    }
}
"#;

// Same suite, calling a method LoginPage does not declare
pub const UNRESOLVED_SUITE_TEST: &str = r#"
package com.example.tests;

import com.example.pages.LoginPage;
import org.junit.Test;

public class LogoutSuiteTest {
    private WebDriver driver;

    @Test
    public void logsOut() {
        LoginPage loginPage = new LoginPage(driver);
        loginPage.logout();
    }
}
"#;

pub const TEST_UTILS: &str = r#"
package com.example.support;

import org.openqa.selenium.JavascriptExecutor;
import org.openqa.selenium.WebDriver;

public class TestUtils {
    public static void scrollToBottom(WebDriver driver) {
        ((JavascriptExecutor) driver).executeScript("window.scrollTo(0, document.body.scrollHeight);");
    }
}
"#;

pub const SHOPPING_CART_TEST: &str = r#"
package com.example.tests;

import com.example.support.TestUtils;
import org.junit.Test;

public class ShoppingCartTest {
    private WebDriver driver;

    @Test
    public void reachesCheckout() {
        driver.get("https://example.com/cart");
        TestUtils.scrollToBottom(driver);
        driver.findElement(By.linkText("Checkout")).click();
    }
}
"#;

pub const CYCLE_A: &str = r#"
package com.example.support;

public class FlowA {
    public static void start() {
        FlowB.next();
    }
}
"#;

pub const CYCLE_B: &str = r#"
package com.example.support;

public class FlowB {
    public static void next() {
        FlowA.start();
    }
}
"#;

pub const BROKEN: &str = r#"
package com.example.tests;

public class BrokenTest {
    @Test
    public void never() {
        driver.get("https://example.com);
    }
}
"#;

// Presence check that binds the element before returning
pub const HOME_PAGE: &str = r#"
package com.example.pages;

import org.openqa.selenium.By;
import org.openqa.selenium.NoSuchElementException;
import org.openqa.selenium.WebDriver;
import org.openqa.selenium.WebElement;

public class HomePage {
    private WebDriver driver;

    public HomePage(WebDriver driver) {
        this.driver = driver;
    }

    public boolean hasBanner() {
        try {
            WebElement banner = driver.findElement(By.id("banner"));
            return true;
        } catch (NoSuchElementException e) {
            return false;
        }
    }
}
"#;

// Element null checks, empty lists, typed text followed by a key, assertion messages
pub const SEARCH_EDGE_TEST: &str = r#"
package com.example.tests;

import org.junit.Test;
import org.openqa.selenium.By;
import org.openqa.selenium.Keys;
import org.openqa.selenium.WebDriver;
import static org.junit.Assert.assertFalse;
import static org.junit.Assert.assertNotNull;
import static org.junit.Assert.assertTrue;

public class SearchEdgeTest {
    private WebDriver driver;

    @Test
    public void searches() {
        driver.get("https://example.com");
        assertNotNull(driver.findElement(By.id("search")));
        driver.findElement(By.name("q")).sendKeys("selenium", Keys.ENTER);
        assertFalse(driver.findElements(By.cssSelector(".result")).isEmpty());
        assertTrue("results shown", driver.getTitle().contains("Results"));
    }
}
"#;
